/// Track domain type
use crate::types::TrackId;
use serde::{Deserialize, Serialize};

/// Where a track's audio lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AudioReference {
    /// Directly playable URL
    Url(String),
    /// Path inside object storage; must be resolved before every load
    StoragePath(String),
}

impl AudioReference {
    /// Classify a raw catalog value
    ///
    /// Anything with an `http://` or `https://` scheme is played as-is,
    /// everything else is treated as an object-storage path.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::StoragePath(trimmed.trim_start_matches('/').to_string())
        }
    }

    /// Whether a storage lookup is needed before the engine can load this
    pub fn needs_resolution(&self) -> bool {
        matches!(self, Self::StoragePath(_))
    }

    /// The raw URL or path
    pub fn as_str(&self) -> &str {
        match self {
            Self::Url(value) | Self::StoragePath(value) => value,
        }
    }
}

/// Playable item
///
/// Tracks are immutable values built by the queue supplier from catalog
/// records; a new browsing context replaces them wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Canonical composite identifier, unique within a queue
    pub id: TrackId,

    /// Display title
    pub title: String,

    /// Reciter or performer
    pub artist: Option<String>,

    /// Artwork reference, resolved by the UI layer
    pub artwork: Option<AudioReference>,

    /// Audio source
    pub audio: AudioReference,
}

impl Track {
    /// Create a track with no artist or artwork
    pub fn new(id: TrackId, title: impl Into<String>, audio: AudioReference) -> Self {
        Self {
            id,
            title: title.into(),
            artist: None,
            artwork: None,
            audio,
        }
    }

    /// Set the artist
    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    /// Set the artwork reference
    #[must_use]
    pub fn with_artwork(mut self, artwork: AudioReference) -> Self {
        self.artwork = Some(artwork);
        self
    }
}
