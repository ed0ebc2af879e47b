//! Player events
//!
//! Broadcast to UI subscribers whenever observable state changes:
//! - Track changes (a new session was installed)
//! - Transport status (playing flag, position, duration)
//! - View-mode, repeat-mode and queue changes
//! - Loading indicator and progress entries
//! - Failures and end of queue

use qasid_core::{ProgressEntry, RepeatMode, Track, TrackId, ViewMode};
use serde::Serialize;

/// Events emitted by the player controller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PlayerEvent {
    /// A new session was installed for `track`
    TrackChanged {
        track: Track,
        /// ID of the previous track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// Transport status of the current session changed
    StatusChanged {
        is_playing: bool,
        position_ms: u64,
        duration_ms: u64,
    },

    /// Player surface changed between hidden, mini and full
    ViewModeChanged { mode: ViewMode },

    /// Repeat policy changed
    RepeatModeChanged { mode: RepeatMode },

    /// Queue replaced
    QueueChanged { length: usize },

    /// Pending play request started (`Some`) or settled (`None`)
    LoadingChanged { track_id: Option<TrackId> },

    /// Progress entry written (`Some`) or removed (`None`)
    ProgressChanged {
        track_id: TrackId,
        entry: Option<ProgressEntry>,
    },

    /// Sequential playback ran past the last queued track
    QueueEnded { track_id: TrackId },

    /// A play request failed; the message is suitable for a transient toast
    PlaybackFailed { track_id: TrackId, message: String },
}
