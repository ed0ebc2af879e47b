/// Repeat and view modes for the player
use serde::{Deserialize, Serialize};

/// Repeat policy governing next/previous and what happens when a track ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatMode {
    /// Walk the queue in order; stop after the last track
    #[default]
    Sequential,
    /// Pick a random other track from the queue
    Shuffle,
    /// Replay the current track
    RepeatOne,
}

impl RepeatMode {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Shuffle => "shuffle",
            Self::RepeatOne => "repeat-one",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sequential" => Some(Self::Sequential),
            "shuffle" => Some(Self::Shuffle),
            "repeat-one" => Some(Self::RepeatOne),
            _ => None,
        }
    }

    /// Mode that results from the user selecting `requested` while in `self`
    ///
    /// Selecting repeat-one twice switches it off again (back to sequential);
    /// the other modes simply overwrite.
    #[must_use]
    pub fn select(self, requested: Self) -> Self {
        match (self, requested) {
            (Self::RepeatOne, Self::RepeatOne) => Self::Sequential,
            (_, requested) => requested,
        }
    }
}

impl std::fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Presentation state of the player surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Nothing has been played yet
    #[default]
    Hidden,
    /// Collapsed bar above the tab navigation
    Mini,
    /// Full-screen player
    Full,
}

impl ViewMode {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::Mini => "mini",
            Self::Full => "full",
        }
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
