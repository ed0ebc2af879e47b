//! Platform media engine contract
//!
//! Decoding and output are delegated to the platform (AVPlayer, ExoPlayer,
//! an HTML audio element, ...). The controller only sees these two traits.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Transport status reported by a loaded handle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStatus {
    /// Whether the handle still holds loaded media
    pub is_loaded: bool,

    /// Whether audio is currently being played
    pub is_playing: bool,

    /// Current position in milliseconds
    pub position_ms: u64,

    /// Media duration in milliseconds (0 while unknown)
    pub duration_ms: u64,

    /// Set on the single status update that reports reaching the end
    pub did_just_finish: bool,
}

impl EngineStatus {
    /// Status of a handle that has nothing loaded
    pub fn unloaded() -> Self {
        Self::default()
    }

    /// Whether the position sits within `tolerance_ms` of a known end
    pub fn is_at_end(&self, tolerance_ms: u64) -> bool {
        self.duration_ms > 0
            && self.position_ms > 0
            && self.position_ms.saturating_add(tolerance_ms) >= self.duration_ms
    }
}

/// Options for loading a source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Start offset in milliseconds
    pub start_position_ms: Option<u64>,

    /// Start playing as soon as the media is ready
    pub should_play: bool,
}

/// Callback receiving status updates from one handle
pub type StatusListener = Arc<dyn Fn(EngineStatus) + Send + Sync>;

/// Platform media engine
///
/// Creates one handle per loaded source. Load failures (unreachable URL,
/// unsupported format) are returned as [`PlaybackError::Load`](crate::PlaybackError::Load);
/// the engine never retries on its own.
#[async_trait]
pub trait PlaybackEngine: Send + Sync {
    /// Load `source` and return a handle to it
    async fn load(&self, source: &str, options: LoadOptions) -> Result<Box<dyn EngineHandle>>;
}

/// One loaded media item
///
/// Implementations deliver status updates to the registered listener several
/// times per second while loaded and on discrete transport events. At most
/// one listener is registered at a time; registering replaces the previous one.
#[async_trait]
pub trait EngineHandle: Send + Sync {
    /// Start or resume playback
    async fn play(&self) -> Result<()>;

    /// Pause playback
    async fn pause(&self) -> Result<()>;

    /// Seek to `position_ms`; clamping past the end is the engine's concern
    async fn seek(&self, position_ms: u64) -> Result<()>;

    /// Query the current status
    async fn status(&self) -> Result<EngineStatus>;

    /// Register (`Some`) or remove (`None`) the status listener
    fn set_status_listener(&self, listener: Option<StatusListener>);

    /// Release the media
    ///
    /// Must be safe to call on a handle that is already unloaded.
    async fn unload(&self) -> Result<()>;
}
