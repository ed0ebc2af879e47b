//! Player controller
//!
//! Owns the single live [`PlaybackSession`] and the observable player state,
//! drives auto-advance on track completion and samples resumable progress.
//!
//! Every `play_track` call takes a fresh [`SessionToken`]. Status updates and
//! load completions carrying an older token are stale: they are dropped, and
//! a handle that finishes loading after being superseded is unloaded instead
//! of installed. This keeps at most one session alive no matter how calls
//! interleave.

use crate::engine::{EngineStatus, LoadOptions, PlaybackEngine};
use crate::error::{PlaybackError, Result};
use crate::events::PlayerEvent;
use crate::progress::{ClearOutcome, ProgressStore, ProgressThrottle, ProgressUpdate};
use crate::queue::{self, Resolution};
use crate::session::PlaybackSession;
use crate::types::{PlaybackConfig, PlayerSnapshot, SessionToken};
use crate::view;
use qasid_core::{
    AudioReference, KeyValueStore, ProgressEntry, ProgressMap, QasidError, RepeatMode,
    StorageUrlResolver, Track, TrackId, ViewMode,
};
use rand::seq::SliceRandom;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Status update tagged with the session it came from
#[derive(Debug, Clone, Copy)]
struct SessionStatus {
    token: SessionToken,
    status: EngineStatus,
}

struct PlayerState {
    current_track: Option<Track>,
    is_playing: bool,
    position_ms: u64,
    duration_ms: u64,
    queue: Vec<Track>,
    repeat_mode: RepeatMode,
    view_mode: ViewMode,
    /// Pending `play_track` call, cleared only by the call that set it
    loading: Option<(SessionToken, TrackId)>,
    progress: ProgressMap,
    throttle: ProgressThrottle,
    session: Option<Arc<PlaybackSession>>,
    /// Token of the most recent `play_track` call
    generation: u64,
    /// Completion already handled for the current session
    finishing: bool,
    shut_down: bool,
}

impl PlayerState {
    fn is_current(&self, token: SessionToken) -> bool {
        self.generation == token.0
    }

    fn current_session(&self, token: SessionToken) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.token() == token)
    }

    fn reset_status(&mut self) {
        self.is_playing = false;
        self.position_ms = 0;
        self.duration_ms = 0;
    }

    /// Forget the current track and hide the player
    ///
    /// Returns whether the view mode changed.
    fn clear_track(&mut self) -> bool {
        self.current_track = None;
        self.reset_status();
        self.finishing = false;
        let changed = self.view_mode != ViewMode::Hidden;
        self.view_mode = ViewMode::Hidden;
        changed
    }

    /// A current track with no session and no pending load behind it
    fn is_orphaned(&self) -> bool {
        self.current_track.is_some() && self.session.is_none() && self.loading.is_none()
    }
}

struct Inner {
    engine: Arc<dyn PlaybackEngine>,
    resolver: Arc<dyn StorageUrlResolver>,
    progress: ProgressStore,
    config: PlaybackConfig,
    state: Mutex<PlayerState>,
    status_tx: mpsc::UnboundedSender<SessionStatus>,
    events: broadcast::Sender<PlayerEvent>,
    pump: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        let pump = self
            .pump
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(pump) = pump {
            pump.abort();
        }
    }
}

/// Clears the loading indicator when a `play_track` call settles
struct LoadingGuard<'a> {
    inner: &'a Inner,
    token: SessionToken,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let (cleared, orphan) = {
            let mut state = self.inner.state();
            let cleared = state
                .loading
                .as_ref()
                .is_some_and(|(token, _)| *token == self.token);
            if cleared {
                state.loading = None;
            }

            // An overtaken call may have disposed the previous session while
            // the newer call installed nothing.
            let orphan = if state.is_orphaned() {
                let track_id = state.current_track.as_ref().map(|track| track.id.clone());
                let view_changed = state.clear_track();
                Some((track_id, view_changed, status_event(&state)))
            } else {
                None
            };
            (cleared, orphan)
        };

        if cleared {
            self.inner
                .emit(PlayerEvent::LoadingChanged { track_id: None });
        }
        if let Some((track_id, view_changed, status)) = orphan {
            if let Some(track_id) = track_id {
                warn!("Dropping {}: no session left after a failed request", track_id);
            }
            self.inner.emit(status);
            if view_changed {
                self.inner.emit(PlayerEvent::ViewModeChanged {
                    mode: ViewMode::Hidden,
                });
            }
        }
    }
}

/// Handle to the player
///
/// Cheap to clone; all clones drive the same player. The status pump stops
/// when the last clone is dropped or [`shutdown`](Self::shutdown) is called.
#[derive(Clone)]
pub struct PlayerController {
    inner: Arc<Inner>,
}

impl PlayerController {
    /// Load saved progress and start the controller
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn start(
        engine: Arc<dyn PlaybackEngine>,
        resolver: Arc<dyn StorageUrlResolver>,
        store: Arc<dyn KeyValueStore>,
        config: PlaybackConfig,
    ) -> Self {
        let progress = ProgressStore::new(store, config.progress_key.clone());
        let saved = progress.load().await;
        info!("Player started with {} saved progress entries", saved.len());

        let (status_tx, status_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        let state = PlayerState {
            current_track: None,
            is_playing: false,
            position_ms: 0,
            duration_ms: 0,
            queue: Vec::new(),
            repeat_mode: config.initial_repeat_mode,
            view_mode: ViewMode::Hidden,
            loading: None,
            progress: saved,
            throttle: ProgressThrottle::new(config.progress_flush_interval()),
            session: None,
            generation: 0,
            finishing: false,
            shut_down: false,
        };

        let inner = Arc::new(Inner {
            engine,
            resolver,
            progress,
            config,
            state: Mutex::new(state),
            status_tx,
            events,
            pump: Mutex::new(None),
        });

        let pump = tokio::spawn(run_status_pump(Arc::downgrade(&inner), status_rx));
        *inner.pump.lock().unwrap_or_else(PoisonError::into_inner) = Some(pump);

        Self { inner }
    }

    /// Subscribe to player events
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.inner.events.subscribe()
    }

    /// Copy of the observable state
    pub fn snapshot(&self) -> PlayerSnapshot {
        let state = self.inner.state();
        PlayerSnapshot {
            current_track: state.current_track.clone(),
            is_playing: state.is_playing,
            position_ms: state.position_ms,
            duration_ms: state.duration_ms,
            queue: state.queue.clone(),
            repeat_mode: state.repeat_mode,
            view_mode: state.view_mode,
            loading_track: state.loading.as_ref().map(|(_, id)| id.clone()),
            progress: state.progress.clone(),
        }
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.inner.config
    }

    /// Track whose play request is still pending
    pub fn loading_track(&self) -> Option<TrackId> {
        self.inner
            .state()
            .loading
            .as_ref()
            .map(|(_, id)| id.clone())
    }

    /// Saved position to resume `track_id` from
    ///
    /// `None` when there is no entry or the entry lies inside the trailing
    /// resume margin.
    pub fn resume_position(&self, track_id: &TrackId) -> Option<u64> {
        self.inner.resumable_entry(track_id).map(|entry| entry.position_ms)
    }

    /// Rounded percentage heard, for resumable tracks only
    pub fn progress_percent(&self, track_id: &TrackId) -> Option<u8> {
        self.inner
            .resumable_entry(track_id)
            .and_then(|entry| entry.percent())
    }

    /// Load and start `track`, replacing whatever is playing
    ///
    /// The previous session is disposed before the new source is loaded.
    /// A call that is overtaken by a newer one returns
    /// [`PlaybackError::Superseded`] and leaves no session behind.
    pub async fn play_track(&self, track: Track, start_position_ms: Option<u64>) -> Result<()> {
        self.inner.play_track(track, start_position_ms).await
    }

    /// Pause when playing, play when paused
    ///
    /// Pressing play on a track that already reached its end runs the
    /// completion policy instead (replay, advance or stop). Without a loaded
    /// track this does nothing.
    pub async fn toggle_play_pause(&self) -> Result<()> {
        let Some(session) = self.inner.session() else {
            debug!("Toggle ignored: no track loaded");
            return Ok(());
        };

        let status = session.handle().status().await?;
        if self.inner.is_finished(&status) {
            return self.inner.complete_forced(session.token()).await;
        }

        if status.is_playing {
            self.inner.pause_session(&session).await
        } else {
            self.inner.play_session(&session).await
        }
    }

    /// Pause playback; does nothing without a loaded track
    pub async fn pause(&self) -> Result<()> {
        match self.inner.session() {
            Some(session) => self.inner.pause_session(&session).await,
            None => Ok(()),
        }
    }

    /// Resume playback, running the completion policy on a finished track
    pub async fn resume(&self) -> Result<()> {
        let Some(session) = self.inner.session() else {
            return Ok(());
        };

        let status = session.handle().status().await?;
        if self.inner.is_finished(&status) {
            return self.inner.complete_forced(session.token()).await;
        }

        self.inner.play_session(&session).await
    }

    /// Seek the loaded track
    pub async fn seek_to(&self, position_ms: u64) -> Result<()> {
        let session = self.inner.session().ok_or(PlaybackError::NoSession)?;
        session.handle().seek(position_ms).await?;

        let status = {
            let mut state = self.inner.state();
            if !state.current_session(session.token()) {
                return Ok(());
            }
            state.position_ms = position_ms;
            state.finishing = false;
            status_event(&state)
        };

        debug!("Seeked {} to {}ms", session.track().id, position_ms);
        self.inner.emit(status);
        Ok(())
    }

    /// Advance according to the repeat mode
    ///
    /// Does nothing in repeat-one mode, with no current track, or when the
    /// current track is not queued. Past the last track in sequential mode
    /// playback stops.
    pub async fn next(&self) -> Result<()> {
        let Some((current, queue, mode)) = self.inner.navigation() else {
            return Ok(());
        };
        if mode == RepeatMode::RepeatOne {
            return Ok(());
        }

        let resolution = queue::resolve_next(&queue, &current.id, mode, &mut rand::thread_rng());
        match resolution {
            Resolution::Track(track) => self.inner.play_track(track, None).await,
            Resolution::EndOfQueue => {
                self.inner.stop_at_end(&current.id).await;
                Ok(())
            }
            Resolution::Unavailable => {
                debug!("Next ignored: {} is not queued", current.id);
                Ok(())
            }
        }
    }

    /// Go back according to the repeat mode
    ///
    /// Sequential mode wraps from the first track to the last.
    pub async fn prev(&self) -> Result<()> {
        let Some((current, queue, mode)) = self.inner.navigation() else {
            return Ok(());
        };
        if mode == RepeatMode::RepeatOne {
            return Ok(());
        }

        let resolution =
            queue::resolve_previous(&queue, &current.id, mode, &mut rand::thread_rng());
        match resolution {
            Resolution::Track(track) => self.inner.play_track(track, None).await,
            Resolution::EndOfQueue | Resolution::Unavailable => {
                debug!("Previous ignored: {} is not queued", current.id);
                Ok(())
            }
        }
    }

    /// Replace the queue
    ///
    /// The current session is left alone; it keeps playing even if its track
    /// is not part of the new queue.
    pub fn set_queue(&self, tracks: Vec<Track>) {
        let length = tracks.len();
        self.inner.state().queue = tracks;
        debug!("Queue replaced with {} tracks", length);
        self.inner.emit(PlayerEvent::QueueChanged { length });
    }

    /// Select a repeat mode; selecting repeat-one twice turns it off
    pub fn set_repeat_mode(&self, requested: RepeatMode) -> RepeatMode {
        let mode = {
            let mut state = self.inner.state();
            state.repeat_mode = state.repeat_mode.select(requested);
            state.repeat_mode
        };

        debug!("Repeat mode set to {}", mode);
        self.inner.emit(PlayerEvent::RepeatModeChanged { mode });
        mode
    }

    /// Switch between the mini and full player
    pub fn set_view_mode(&self, requested: ViewMode) -> Result<()> {
        let changed = {
            let mut state = self.inner.state();
            let mode = view::explicit(requested, state.current_track.is_some())?;
            let changed = state.view_mode != mode;
            state.view_mode = mode;
            changed
        };

        if changed {
            self.inner
                .emit(PlayerEvent::ViewModeChanged { mode: requested });
        }
        Ok(())
    }

    /// Delete the saved progress of one track
    ///
    /// Returns whether an entry existed.
    pub async fn clear_progress(&self, track_id: &TrackId) -> bool {
        let removed = self.inner.state().progress.remove(track_id).is_some();
        if removed {
            self.inner.emit(PlayerEvent::ProgressChanged {
                track_id: track_id.clone(),
                entry: None,
            });
        }

        // The stored copy can still hold the entry after a failed write
        let stored = match self.inner.progress.clear_entry(track_id).await {
            ClearOutcome::Missing => false,
            ClearOutcome::Cleared => true,
            ClearOutcome::Failed => {
                warn!("Saved progress of {} is still on disk", track_id);
                true
            }
        };

        if removed || stored {
            info!("Cleared progress of {}", track_id);
        }
        removed || stored
    }

    /// React to the user tapping a track in a list
    ///
    /// - the playing track is paused
    /// - the paused current track resumes, from its saved position if any
    /// - any other track starts, from its saved position if any
    pub async fn activate_track(&self, track: Track) -> Result<()> {
        let (is_current, is_playing) = {
            let state = self.inner.state();
            let is_current = state
                .current_track
                .as_ref()
                .is_some_and(|current| current.id == track.id);
            (is_current, state.is_playing)
        };
        let resume_from = self.resume_position(&track.id);

        match (is_current, is_playing) {
            (true, true) => self.pause().await,
            (true, false) => {
                if let Some(position_ms) = resume_from {
                    self.seek_to(position_ms).await?;
                }
                self.resume().await
            }
            (false, _) => self.play_track(track, resume_from).await,
        }
    }

    /// Queue `tracks` and activate the first one
    ///
    /// An empty list does nothing.
    pub async fn play_all(&self, tracks: Vec<Track>) -> Result<()> {
        let Some(first) = tracks.first().cloned() else {
            return Ok(());
        };
        self.set_queue(tracks);
        self.activate_track(first).await
    }

    /// Queue `tracks` and activate one picked at random
    ///
    /// The repeat mode is left alone. An empty list does nothing.
    pub async fn shuffle_play(&self, tracks: Vec<Track>) -> Result<()> {
        let pick = tracks.choose(&mut rand::thread_rng()).cloned();
        let Some(pick) = pick else {
            return Ok(());
        };
        debug!("Shuffle picked {} of {} tracks", pick.id, tracks.len());
        self.set_queue(tracks);
        self.activate_track(pick).await
    }

    /// Stop playback, flush progress and stop the status pump
    ///
    /// The current track is cleared and pending play requests are superseded.
    /// Later play requests fail with [`PlaybackError::ShutDown`].
    pub async fn shutdown(&self) {
        let (session, view_changed, status) = {
            let mut state = self.inner.state();
            state.shut_down = true;
            state.generation += 1;
            let session = state.session.take();
            let view_changed = state.clear_track();
            (session, view_changed, status_event(&state))
        };

        if let Some(session) = session {
            session.dispose().await;
        }
        self.inner.emit(status);
        if view_changed {
            self.inner.emit(PlayerEvent::ViewModeChanged {
                mode: ViewMode::Hidden,
            });
        }
        self.inner.persist_progress().await;

        let pump = self
            .inner
            .pump
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(pump) = pump {
            pump.abort();
        }

        info!("Player shut down");
    }
}

impl std::fmt::Debug for PlayerController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state();
        f.debug_struct("PlayerController")
            .field("current_track", &state.current_track.as_ref().map(|t| &t.id))
            .field("is_playing", &state.is_playing)
            .field("repeat_mode", &state.repeat_mode)
            .field("view_mode", &state.view_mode)
            .finish_non_exhaustive()
    }
}

async fn run_status_pump(inner: Weak<Inner>, mut rx: mpsc::UnboundedReceiver<SessionStatus>) {
    while let Some(SessionStatus { token, status }) = rx.recv().await {
        let Some(inner) = inner.upgrade() else {
            break;
        };
        inner.handle_status(token, status).await;
    }
    debug!("Status pump stopped");
}

fn status_event(state: &PlayerState) -> PlayerEvent {
    PlayerEvent::StatusChanged {
        is_playing: state.is_playing,
        position_ms: state.position_ms,
        duration_ms: state.duration_ms,
    }
}

fn load_error(err: PlaybackError) -> PlaybackError {
    match err {
        PlaybackError::Load(_) => err,
        other => PlaybackError::Load(other.to_string()),
    }
}

fn resolution_error(path: &str, err: QasidError) -> PlaybackError {
    match err {
        QasidError::Resolution { path, reason } => PlaybackError::Resolution { path, reason },
        other => PlaybackError::Resolution {
            path: path.to_string(),
            reason: other.to_string(),
        },
    }
}

/// Result of applying one status update under the state lock
struct StatusOutcome {
    track_id: TrackId,
    status: PlayerEvent,
    progress: Option<Option<ProgressEntry>>,
    finished: bool,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, PlayerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: PlayerEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn session(&self) -> Option<Arc<PlaybackSession>> {
        self.state().session.clone()
    }

    fn navigation(&self) -> Option<(Track, Vec<Track>, RepeatMode)> {
        let state = self.state();
        let current = state.current_track.clone()?;
        Some((current, state.queue.clone(), state.repeat_mode))
    }

    fn resumable_entry(&self, track_id: &TrackId) -> Option<ProgressEntry> {
        self.state()
            .progress
            .get(track_id)
            .copied()
            .filter(|entry| entry.is_resumable_with_margin(self.config.resume_margin_ms))
    }

    fn is_finished(&self, status: &EngineStatus) -> bool {
        !status.is_loaded
            || status.did_just_finish
            || status.is_at_end(self.config.finish_tolerance_ms)
    }

    async fn persist_progress(&self) {
        self.progress
            .save_latest(|| self.state().progress.clone())
            .await;
    }

    async fn resolve_source(&self, track: &Track) -> Result<String> {
        match &track.audio {
            AudioReference::Url(url) => Ok(url.clone()),
            AudioReference::StoragePath(path) => self
                .resolver
                .resolve(path)
                .await
                .map_err(|e| resolution_error(path, e)),
        }
    }

    async fn play_track(&self, track: Track, start_position_ms: Option<u64>) -> Result<()> {
        let token = {
            let mut state = self.state();
            if state.shut_down {
                return Err(PlaybackError::ShutDown);
            }
            state.generation += 1;
            let token = SessionToken(state.generation);
            state.loading = Some((token, track.id.clone()));
            token
        };
        self.emit(PlayerEvent::LoadingChanged {
            track_id: Some(track.id.clone()),
        });
        let _loading = LoadingGuard { inner: self, token };

        info!("Playing {} (session {})", track.id, token);

        // Resolve before tearing anything down so a failed lookup keeps the
        // current track playing.
        let source = match self.resolve_source(&track).await {
            Ok(source) => source,
            Err(e) => {
                warn!("Failed to resolve {}: {}", track.id, e);
                self.emit(PlayerEvent::PlaybackFailed {
                    track_id: track.id.clone(),
                    message: e.to_string(),
                });
                return Err(e);
            }
        };

        let previous = {
            let mut state = self.state();
            if !state.is_current(token) {
                return Err(PlaybackError::Superseded);
            }
            state.is_playing = false;
            state.session.take()
        };
        if let Some(previous) = previous {
            previous.dispose().await;
        }

        let options = LoadOptions {
            start_position_ms,
            should_play: false,
        };
        let handle = match self.engine.load(&source, options).await {
            Ok(handle) => handle,
            Err(e) => {
                let e = load_error(e);
                let cleared = {
                    let mut state = self.state();
                    if state.is_current(token) {
                        state.clear_track();
                        true
                    } else {
                        false
                    }
                };
                if !cleared {
                    return Err(PlaybackError::Superseded);
                }

                warn!("Failed to load {}: {}", track.id, e);
                self.emit(PlayerEvent::ViewModeChanged {
                    mode: ViewMode::Hidden,
                });
                self.emit(PlayerEvent::PlaybackFailed {
                    track_id: track.id.clone(),
                    message: e.to_string(),
                });
                return Err(e);
            }
        };

        let session = Arc::new(PlaybackSession::new(token, track.clone(), handle));
        let installed = {
            let mut state = self.state();
            if state.is_current(token) {
                let previous_track_id = state
                    .current_track
                    .replace(track.clone())
                    .map(|previous| previous.id);
                state.position_ms = start_position_ms.unwrap_or(0);
                state.duration_ms = 0;
                state.finishing = false;
                state.throttle.restart();
                state.view_mode = view::after_play(state.view_mode);
                state.session = Some(Arc::clone(&session));
                Some((previous_track_id, state.view_mode))
            } else {
                None
            }
        };
        let Some((previous_track_id, view_mode)) = installed else {
            debug!("Discarding superseded load of {}", track.id);
            session.dispose().await;
            return Err(PlaybackError::Superseded);
        };

        let status_tx = self.status_tx.clone();
        session.attach(Arc::new(move |status| {
            // Closed only while shutting down
            let _ = status_tx.send(SessionStatus { token, status });
        }));

        self.emit(PlayerEvent::TrackChanged {
            track: track.clone(),
            previous_track_id,
        });
        self.emit(PlayerEvent::ViewModeChanged { mode: view_mode });

        if let Err(e) = session.handle().play().await {
            warn!("Failed to start {}: {}", track.id, e);
            let torn_down = {
                let mut state = self.state();
                if state.current_session(token) {
                    state.session = None;
                    state.clear_track();
                    true
                } else {
                    false
                }
            };
            if torn_down {
                session.dispose().await;
                self.emit(PlayerEvent::ViewModeChanged {
                    mode: ViewMode::Hidden,
                });
            }
            self.emit(PlayerEvent::PlaybackFailed {
                track_id: track.id.clone(),
                message: e.to_string(),
            });
            return Err(e);
        }

        let status = {
            let mut state = self.state();
            if !state.current_session(token) {
                return Ok(());
            }
            state.is_playing = true;
            status_event(&state)
        };
        self.emit(status);

        Ok(())
    }

    async fn handle_status(&self, token: SessionToken, status: EngineStatus) {
        let outcome = {
            let mut state = self.state();
            let Some(track_id) = state
                .session
                .as_ref()
                .filter(|session| session.token() == token)
                .map(|session| session.track().id.clone())
            else {
                return;
            };
            if !status.is_loaded {
                return;
            }

            state.is_playing = status.is_playing;
            state.position_ms = status.position_ms;
            if status.duration_ms > 0 {
                state.duration_ms = status.duration_ms;
            }

            let mut progress = None;
            if state.throttle.ready() {
                let update = ProgressUpdate::from_sample(
                    state.position_ms,
                    state.duration_ms,
                    self.config.finished_ratio,
                );
                if update.apply(&mut state.progress, &track_id) {
                    progress = Some(state.progress.get(&track_id).copied());
                }
            }

            let finished = status.did_just_finish && !std::mem::replace(&mut state.finishing, true);
            if finished && state.progress.remove(&track_id).is_some() {
                progress = Some(None);
            }

            StatusOutcome {
                track_id,
                status: status_event(&state),
                progress,
                finished,
            }
        };

        self.emit(outcome.status);

        if let Some(entry) = outcome.progress {
            self.emit(PlayerEvent::ProgressChanged {
                track_id: outcome.track_id.clone(),
                entry,
            });
            self.persist_progress().await;
        }

        if outcome.finished {
            info!("Finished {}", outcome.track_id);
            if let Err(e) = self.complete(token).await {
                if e.is_user_visible() {
                    warn!("Auto-advance after {} failed: {}", outcome.track_id, e);
                }
            }
        }
    }

    /// Completion policy requested by the user on a finished track
    async fn complete_forced(&self, token: SessionToken) -> Result<()> {
        self.state().finishing = true;
        self.complete(token).await
    }

    /// Replay, advance or stop after the track of `token` ended
    async fn complete(&self, token: SessionToken) -> Result<()> {
        let navigation = {
            let state = self.state();
            if !state.current_session(token) {
                return Ok(());
            }
            state
                .current_track
                .clone()
                .map(|current| (current, state.queue.clone(), state.repeat_mode))
        };
        let Some((current, queue, mode)) = navigation else {
            return Ok(());
        };

        if mode == RepeatMode::RepeatOne {
            return self.play_track(current, None).await;
        }

        let resolution = queue::resolve_next(&queue, &current.id, mode, &mut rand::thread_rng());
        match resolution {
            Resolution::Track(next) => self.play_track(next, None).await,
            Resolution::EndOfQueue => {
                self.stop_at_end(&current.id).await;
                Ok(())
            }
            Resolution::Unavailable => {
                let status = {
                    let mut state = self.state();
                    state.is_playing = false;
                    status_event(&state)
                };
                self.emit(status);
                Ok(())
            }
        }
    }

    async fn stop_at_end(&self, track_id: &TrackId) {
        if let Some(session) = self.session() {
            if let Err(e) = session.handle().pause().await {
                warn!("Failed to pause {} at end of queue: {}", track_id, e);
            }
        }

        let (status, view_change) = {
            let mut state = self.state();
            state.is_playing = false;
            let mode = view::after_queue_end(state.view_mode);
            let changed = mode != state.view_mode;
            state.view_mode = mode;
            (status_event(&state), changed.then_some(mode))
        };

        info!("Reached end of queue after {}", track_id);
        self.emit(status);
        if let Some(mode) = view_change {
            self.emit(PlayerEvent::ViewModeChanged { mode });
        }
        self.emit(PlayerEvent::QueueEnded {
            track_id: track_id.clone(),
        });
    }

    async fn pause_session(&self, session: &PlaybackSession) -> Result<()> {
        session.handle().pause().await?;
        self.set_playing(session.token(), false);
        Ok(())
    }

    async fn play_session(&self, session: &PlaybackSession) -> Result<()> {
        session.handle().play().await?;
        self.set_playing(session.token(), true);
        Ok(())
    }

    fn set_playing(&self, token: SessionToken, is_playing: bool) {
        let status = {
            let mut state = self.state();
            if !state.current_session(token) {
                return;
            }
            state.is_playing = is_playing;
            status_event(&state)
        };
        self.emit(status);
    }
}
