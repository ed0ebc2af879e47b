/// Per-track listening progress
use crate::types::TrackId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Positions less than this far from the end are treated as finished, not resumable
pub const RESUME_MARGIN_MS: u64 = 5_000;

/// Progress ratio at or above which a track counts as finished
pub const FINISHED_RATIO: f64 = 0.98;

/// Whole progress mapping, persisted as one serialized blob
pub type ProgressMap = BTreeMap<TrackId, ProgressEntry>;

/// Saved listening position for one track
///
/// Serialized with the `positionMillis`/`durationMillis` field names so blobs
/// written by earlier app versions keep loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEntry {
    /// Last sampled position in milliseconds
    #[serde(rename = "positionMillis")]
    pub position_ms: u64,

    /// Track duration in milliseconds
    #[serde(rename = "durationMillis")]
    pub duration_ms: u64,
}

impl ProgressEntry {
    pub fn new(position_ms: u64, duration_ms: u64) -> Self {
        Self {
            position_ms,
            duration_ms,
        }
    }

    /// Fraction of the track already heard, `None` when duration is unknown
    pub fn ratio(&self) -> Option<f64> {
        (self.duration_ms > 0).then(|| self.position_ms as f64 / self.duration_ms as f64)
    }

    /// Whether the sample is close enough to the end to drop the entry
    pub fn is_finished(&self) -> bool {
        self.ratio().is_some_and(|ratio| ratio >= FINISHED_RATIO)
    }

    /// Whether the sample carries anything worth saving
    pub fn is_meaningful(&self) -> bool {
        self.position_ms > 0 && self.duration_ms > 0
    }

    /// Whether the UI should offer "resume" for this entry
    pub fn is_resumable(&self) -> bool {
        self.is_resumable_with_margin(RESUME_MARGIN_MS)
    }

    /// [`is_resumable`](Self::is_resumable) with an explicit trailing margin
    pub fn is_resumable_with_margin(&self, margin_ms: u64) -> bool {
        self.is_meaningful() && self.duration_ms.saturating_sub(self.position_ms) >= margin_ms
    }

    /// Position to resume from, if resumable
    pub fn resume_position(&self) -> Option<u64> {
        self.is_resumable().then_some(self.position_ms)
    }

    /// Rounded percentage heard, for "In progress · N%" labels
    pub fn percent(&self) -> Option<u8> {
        self.ratio()
            .map(|ratio| (ratio * 100.0).round().clamp(0.0, 100.0) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn resume_margin_boundary() {
        assert!(ProgressEntry::new(5_000, 10_000).is_resumable());
        assert!(!ProgressEntry::new(5_001, 10_000).is_resumable());
        assert!(!ProgressEntry::new(12_000, 10_000).is_resumable());
    }

    #[test]
    fn zero_position_or_duration_is_not_resumable() {
        assert!(!ProgressEntry::new(0, 100_000).is_resumable());
        assert!(!ProgressEntry::new(1_000, 0).is_resumable());
        assert!(!ProgressEntry::new(1_000, 3_000).is_resumable());
    }

    #[test]
    fn finished_at_ninety_eight_percent() {
        assert!(ProgressEntry::new(98_000, 100_000).is_finished());
        assert!(!ProgressEntry::new(97_999, 100_000).is_finished());
        assert!(!ProgressEntry::new(500, 0).is_finished());
    }

    #[test]
    fn percent_is_rounded() {
        assert_eq!(ProgressEntry::new(1_234, 10_000).percent(), Some(12));
        assert_eq!(ProgressEntry::new(1, 0).percent(), None);
    }

    #[test]
    fn serialized_with_millis_field_names() {
        let mut map = ProgressMap::new();
        map.insert(TrackId::nasheed("a"), ProgressEntry::new(4_000, 10_000));

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(
            json,
            r#"{"nasheed:a":{"positionMillis":4000,"durationMillis":10000}}"#
        );
    }

    proptest! {
        #[test]
        fn within_margin_is_never_resumable(duration in 1u64..10_000_000, gap in 0u64..5_000) {
            let position = duration.saturating_sub(gap);
            prop_assert!(!ProgressEntry::new(position, duration).is_resumable());
        }

        #[test]
        fn outside_margin_is_resumable(position in 1u64..10_000_000, gap in 5_000u64..1_000_000) {
            let entry = ProgressEntry::new(position, position + gap);
            prop_assert!(entry.is_resumable());
            prop_assert_eq!(entry.resume_position(), Some(position));
        }
    }
}
