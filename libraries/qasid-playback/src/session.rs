//! Playback session - the single live engine handle

use crate::engine::{EngineHandle, StatusListener};
use crate::types::SessionToken;
use qasid_core::Track;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// One loaded track and its engine handle
///
/// Owned exclusively by the controller. Disposal unregisters the status
/// listener before unloading so no update can arrive after teardown, and is
/// idempotent.
pub struct PlaybackSession {
    token: SessionToken,
    track: Track,
    handle: Box<dyn EngineHandle>,
    disposed: AtomicBool,
}

impl PlaybackSession {
    pub(crate) fn new(token: SessionToken, track: Track, handle: Box<dyn EngineHandle>) -> Self {
        Self {
            token,
            track,
            handle,
            disposed: AtomicBool::new(false),
        }
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub(crate) fn handle(&self) -> &dyn EngineHandle {
        self.handle.as_ref()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Route status updates of this handle to `listener`
    pub(crate) fn attach(&self, listener: StatusListener) {
        if self.is_disposed() {
            return;
        }
        self.handle.set_status_listener(Some(listener));
    }

    /// Unregister the listener and unload the handle
    ///
    /// Unload failures are logged; the session counts as disposed either way.
    pub(crate) async fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }

        self.handle.set_status_listener(None);
        match self.handle.unload().await {
            Ok(()) => debug!("Disposed session {} ({})", self.token, self.track.id),
            Err(e) => warn!(
                "Failed to unload session {} ({}): {}",
                self.token, self.track.id, e
            ),
        }
    }
}

impl std::fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("token", &self.token)
            .field("track", &self.track.id)
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}
