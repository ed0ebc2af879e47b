//! Core types for playback control

use qasid_core::{ProgressMap, RepeatMode, Track, TrackId, ViewMode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Identifies one [`PlaybackSession`](crate::session::PlaybackSession)
///
/// Tokens increase with every `play_track` call; status events and in-flight
/// loads carrying an older token are stale and get discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionToken(pub(crate) u64);

impl SessionToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Configuration for the player controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Minimum wall time between two progress samples (default: 2500 ms)
    pub progress_flush_interval_ms: u64,

    /// Progress ratio at which a track counts as finished (default: 0.98)
    pub finished_ratio: f64,

    /// Trailing margin inside which "resume" is not offered (default: 5000 ms)
    pub resume_margin_ms: u64,

    /// A position this close to the end counts as finished when the user
    /// presses play on a stopped track (default: 100 ms)
    pub finish_tolerance_ms: u64,

    /// Repeat mode at startup (default: sequential)
    pub initial_repeat_mode: RepeatMode,

    /// Key the progress mapping is stored under
    pub progress_key: String,

    /// Capacity of the player event channel (default: 64)
    pub event_capacity: usize,
}

/// Key the progress mapping is stored under by default
pub const DEFAULT_PROGRESS_KEY: &str = "playback.progress";

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            progress_flush_interval_ms: 2_500,
            finished_ratio: qasid_core::FINISHED_RATIO,
            resume_margin_ms: qasid_core::RESUME_MARGIN_MS,
            finish_tolerance_ms: 100,
            initial_repeat_mode: RepeatMode::Sequential,
            progress_key: DEFAULT_PROGRESS_KEY.to_string(),
            event_capacity: 64,
        }
    }
}

impl PlaybackConfig {
    pub fn progress_flush_interval(&self) -> Duration {
        Duration::from_millis(self.progress_flush_interval_ms)
    }
}

/// Point-in-time copy of the observable player state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub current_track: Option<Track>,
    pub is_playing: bool,
    pub position_ms: u64,
    pub duration_ms: u64,
    pub queue: Vec<Track>,
    pub repeat_mode: RepeatMode,
    pub view_mode: ViewMode,
    /// Track whose `play_track` call is still pending
    pub loading_track: Option<TrackId>,
    pub progress: ProgressMap,
}

impl PlayerSnapshot {
    /// Whether `track_id` is the loaded track
    pub fn is_current(&self, track_id: &TrackId) -> bool {
        self.current_track
            .as_ref()
            .is_some_and(|track| &track.id == track_id)
    }
}
