//! View-mode transitions
//!
//! hidden -> mini on first play; mini <-> full on explicit user action;
//! full -> mini when the queue runs out. Only a failed load returns to hidden.

use crate::error::{PlaybackError, Result};
use qasid_core::ViewMode;

/// Mode after a track was installed
pub fn after_play(current: ViewMode) -> ViewMode {
    match current {
        ViewMode::Full => ViewMode::Full,
        ViewMode::Hidden | ViewMode::Mini => ViewMode::Mini,
    }
}

/// Mode after sequential playback ended
pub fn after_queue_end(current: ViewMode) -> ViewMode {
    match current {
        ViewMode::Full => ViewMode::Mini,
        other => other,
    }
}

/// Validate a mode change requested by the user
pub fn explicit(requested: ViewMode, has_track: bool) -> Result<ViewMode> {
    match requested {
        ViewMode::Hidden => Err(PlaybackError::InvalidOperation(
            "The player cannot be hidden explicitly".to_string(),
        )),
        ViewMode::Mini | ViewMode::Full if !has_track => Err(PlaybackError::NoSession),
        ViewMode::Mini | ViewMode::Full => Ok(requested),
    }
}
