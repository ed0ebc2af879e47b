//! Error types for playback control

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Storage path could not be turned into a playable URL
    #[error("Could not resolve audio '{path}': {reason}")]
    Resolution { path: String, reason: String },

    /// Engine refused or failed to load the source
    #[error("Failed to load audio: {0}")]
    Load(String),

    /// Transport operation failed on a loaded handle
    #[error("Engine error: {0}")]
    Engine(String),

    /// No track is currently loaded
    #[error("No track loaded")]
    NoSession,

    /// A newer play request replaced this one before it completed
    #[error("Superseded by a newer play request")]
    Superseded,

    /// The player was shut down
    #[error("Player has been shut down")]
    ShutDown,

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl PlaybackError {
    /// Whether the UI should tell the user about this error
    ///
    /// Superseded requests are not failures from the user's point of view.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::Superseded)
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
