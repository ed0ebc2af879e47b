/// ID types for Qasid entities
use serde::{Deserialize, Serialize};
use std::fmt;

/// Track identifier
///
/// One canonical scheme is used everywhere a track is compared or keyed
/// (queue lookups, progress entries, "now playing" indicators), so ids are
/// composite and globally unique across content types:
///
/// - recitations: `quran:<reciter id>:<surah number>`
/// - nasheeds: `nasheed:<document id>`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Wrap an already-canonical id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id of one surah recited by one reciter
    pub fn recitation(reciter_id: impl fmt::Display, surah_number: u16) -> Self {
        Self(format!("quran:{reciter_id}:{surah_number}"))
    }

    /// Id of a nasheed document
    pub fn nasheed(id: impl fmt::Display) -> Self {
        Self(format!("nasheed:{id}"))
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TrackId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_ids_do_not_collide_across_content_types() {
        let recitation = TrackId::recitation(12, 3);
        let nasheed = TrackId::nasheed("12-3");

        assert_eq!(recitation.as_str(), "quran:12:3");
        assert_eq!(nasheed.as_str(), "nasheed:12-3");
        assert_ne!(recitation, nasheed);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = TrackId::nasheed("abc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"nasheed:abc\"");

        let back: TrackId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
