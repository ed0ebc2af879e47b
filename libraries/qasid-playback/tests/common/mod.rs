//! Shared mocks for controller integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use qasid_core::{
    AudioReference, KeyValueStore, QasidError, StorageUrlResolver, Track, TrackId,
};
use qasid_playback::{
    EngineHandle, EngineStatus, LoadOptions, PlaybackConfig, PlaybackEngine, PlaybackError,
    PlayerController, PlayerEvent, StatusListener, DEFAULT_PROGRESS_KEY,
};
use qasid_storage::MemoryKeyValueStore;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, Notify};

pub const RECITER: &str = "7";

/// Recitation of `surah` with a direct URL
pub fn surah(number: u16) -> Track {
    Track::new(
        TrackId::recitation(RECITER, number),
        format!("Surah {number:03}"),
        AudioReference::from_raw(format!("https://server.example.com/afs/{number:03}.mp3")),
    )
    .with_artist("Mishary Alafasy")
}

pub fn surah_url(number: u16) -> String {
    format!("https://server.example.com/afs/{number:03}.mp3")
}

/// Nasheed stored under `nasheeds/<id>.mp3`
pub fn nasheed(id: &str) -> Track {
    Track::new(
        TrackId::nasheed(id),
        format!("Nasheed {id}"),
        AudioReference::from_raw(format!("nasheeds/{id}.mp3")),
    )
    .with_artist("Nasheed")
}

pub fn nasheed_url(id: &str) -> String {
    format!("https://storage.example.com/nasheeds/{id}.mp3?token=abc")
}

// ============================================================================
// Engine
// ============================================================================

/// One loaded source
pub struct MockHandle {
    pub source: String,
    pub options: LoadOptions,
    status: Mutex<EngineStatus>,
    listener: Mutex<Option<StatusListener>>,
    plays: AtomicUsize,
    pauses: AtomicUsize,
    unloads: AtomicUsize,
    seeks: Mutex<Vec<u64>>,
    refuse_play: AtomicBool,
}

impl MockHandle {
    fn new(source: &str, options: LoadOptions, duration_ms: u64) -> Self {
        Self {
            source: source.to_string(),
            options,
            status: Mutex::new(EngineStatus {
                is_loaded: true,
                is_playing: false,
                position_ms: options.start_position_ms.unwrap_or(0),
                duration_ms,
                did_just_finish: false,
            }),
            listener: Mutex::new(None),
            plays: AtomicUsize::new(0),
            pauses: AtomicUsize::new(0),
            unloads: AtomicUsize::new(0),
            seeks: Mutex::new(Vec::new()),
            refuse_play: AtomicBool::new(false),
        }
    }

    /// Replace the status without notifying the listener
    pub fn set_status(&self, status: EngineStatus) {
        *self.status.lock().unwrap() = status;
    }

    /// Replace the status and notify the listener, as the platform would
    pub fn emit(&self, status: EngineStatus) {
        self.set_status(status);
        let listener = self.listener.lock().unwrap().clone();
        if let Some(listener) = listener {
            listener(status);
        }
    }

    /// Report a playing position
    pub fn progress(&self, position_ms: u64, duration_ms: u64) {
        self.emit(EngineStatus {
            is_loaded: true,
            is_playing: true,
            position_ms,
            duration_ms,
            did_just_finish: false,
        });
    }

    /// Report reaching the end
    pub fn finish(&self, duration_ms: u64) {
        self.emit(EngineStatus {
            is_loaded: true,
            is_playing: false,
            position_ms: duration_ms,
            duration_ms,
            did_just_finish: true,
        });
    }

    /// Make `play` fail from now on
    pub fn refuse_play(&self) {
        self.refuse_play.store(true, Ordering::SeqCst);
    }

    pub fn listener(&self) -> Option<StatusListener> {
        self.listener.lock().unwrap().clone()
    }

    pub fn has_listener(&self) -> bool {
        self.listener.lock().unwrap().is_some()
    }

    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }

    pub fn pauses(&self) -> usize {
        self.pauses.load(Ordering::SeqCst)
    }

    pub fn unloads(&self) -> usize {
        self.unloads.load(Ordering::SeqCst)
    }

    pub fn seeks(&self) -> Vec<u64> {
        self.seeks.lock().unwrap().clone()
    }
}

struct SharedHandle(Arc<MockHandle>);

#[async_trait]
impl EngineHandle for SharedHandle {
    async fn play(&self) -> qasid_playback::Result<()> {
        self.0.plays.fetch_add(1, Ordering::SeqCst);
        if self.0.refuse_play.load(Ordering::SeqCst) {
            return Err(PlaybackError::Engine("output device unavailable".to_string()));
        }
        let mut status = self.0.status.lock().unwrap();
        status.is_playing = true;
        status.did_just_finish = false;
        Ok(())
    }

    async fn pause(&self) -> qasid_playback::Result<()> {
        self.0.pauses.fetch_add(1, Ordering::SeqCst);
        self.0.status.lock().unwrap().is_playing = false;
        Ok(())
    }

    async fn seek(&self, position_ms: u64) -> qasid_playback::Result<()> {
        self.0.seeks.lock().unwrap().push(position_ms);
        let mut status = self.0.status.lock().unwrap();
        status.position_ms = position_ms;
        status.did_just_finish = false;
        Ok(())
    }

    async fn status(&self) -> qasid_playback::Result<EngineStatus> {
        Ok(*self.0.status.lock().unwrap())
    }

    fn set_status_listener(&self, listener: Option<StatusListener>) {
        *self.0.listener.lock().unwrap() = listener;
    }

    async fn unload(&self) -> qasid_playback::Result<()> {
        self.0.unloads.fetch_add(1, Ordering::SeqCst);
        self.0.status.lock().unwrap().is_loaded = false;
        Ok(())
    }
}

/// Engine that records every handle it creates
#[derive(Default)]
pub struct MockEngine {
    handles: Mutex<Vec<Arc<MockHandle>>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    failing: Mutex<HashSet<String>>,
    refusing_play: Mutex<HashSet<String>>,
    loads: AtomicUsize,
    duration_ms: AtomicU64,
}

impl MockEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Hold loads of `source` until the returned notify fires
    pub fn gate(&self, source: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(source.to_string(), Arc::clone(&notify));
        notify
    }

    /// Make loads of `source` fail
    pub fn fail(&self, source: &str) {
        self.failing.lock().unwrap().insert(source.to_string());
    }

    /// Load `source` fine but fail to start it
    pub fn fail_play(&self, source: &str) {
        self.refusing_play.lock().unwrap().insert(source.to_string());
    }

    /// Duration reported by newly loaded handles
    pub fn set_duration(&self, duration_ms: u64) {
        self.duration_ms.store(duration_ms, Ordering::SeqCst);
    }

    /// Number of `load` calls started
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn handles(&self) -> Vec<Arc<MockHandle>> {
        self.handles.lock().unwrap().clone()
    }

    /// Most recent handle for `source`
    pub fn handle_for(&self, source: &str) -> Arc<MockHandle> {
        self.handles()
            .into_iter()
            .rev()
            .find(|handle| handle.source == source)
            .unwrap_or_else(|| panic!("no handle loaded for {source}"))
    }

    pub fn last_handle(&self) -> Arc<MockHandle> {
        self.handles().last().cloned().expect("no handle loaded")
    }

    /// Handles that were never unloaded
    pub fn live_handles(&self) -> usize {
        self.handles()
            .iter()
            .filter(|handle| handle.unloads() == 0)
            .count()
    }
}

#[async_trait]
impl PlaybackEngine for MockEngine {
    async fn load(
        &self,
        source: &str,
        options: LoadOptions,
    ) -> qasid_playback::Result<Box<dyn EngineHandle>> {
        self.loads.fetch_add(1, Ordering::SeqCst);

        let gate = self.gates.lock().unwrap().remove(source);
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.failing.lock().unwrap().contains(source) {
            return Err(PlaybackError::Load(format!("unsupported source {source}")));
        }

        let duration_ms = self.duration_ms.load(Ordering::SeqCst);
        let handle = Arc::new(MockHandle::new(source, options, duration_ms));
        if self.refusing_play.lock().unwrap().contains(source) {
            handle.refuse_play();
        }
        self.handles.lock().unwrap().push(Arc::clone(&handle));
        Ok(Box::new(SharedHandle(handle)))
    }
}

// ============================================================================
// Collaborators
// ============================================================================

/// Resolver that knows a fixed set of storage paths
#[derive(Default)]
pub struct StaticResolver {
    urls: Mutex<HashMap<String, String>>,
    calls: AtomicUsize,
}

impl StaticResolver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insert(&self, path: &str, url: &str) {
        self.urls
            .lock()
            .unwrap()
            .insert(path.to_string(), url.to_string());
    }

    /// Register the URL of `nasheed(id)`
    pub fn knows_nasheed(&self, id: &str) {
        self.insert(&format!("nasheeds/{id}.mp3"), &nasheed_url(id));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageUrlResolver for StaticResolver {
    async fn resolve(&self, relative_path: &str) -> qasid_core::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls
            .lock()
            .unwrap()
            .get(relative_path)
            .cloned()
            .ok_or_else(|| QasidError::resolution(relative_path, "object does not exist"))
    }
}

/// In-memory store that counts writes and can be made to fail
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryKeyValueStore,
    writes: AtomicUsize,
    failing: AtomicBool,
}

impl RecordingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Store with a saved progress blob
    pub fn with_progress(json: &str) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryKeyValueStore::with_entry(DEFAULT_PROGRESS_KEY, json),
            ..Self::default()
        })
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Currently stored progress blob
    pub async fn progress_json(&self) -> Option<String> {
        self.inner.get(DEFAULT_PROGRESS_KEY).await.unwrap()
    }
}

#[async_trait]
impl KeyValueStore for RecordingStore {
    async fn get(&self, key: &str) -> qasid_core::Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> qasid_core::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(QasidError::storage("disk full"));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> qasid_core::Result<()> {
        self.inner.remove(key).await
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub player: PlayerController,
    pub engine: Arc<MockEngine>,
    pub resolver: Arc<StaticResolver>,
    pub store: Arc<RecordingStore>,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_store(RecordingStore::new()).await
    }

    pub async fn with_store(store: Arc<RecordingStore>) -> Self {
        Self::with_config(store, PlaybackConfig::default()).await
    }

    pub async fn with_config(store: Arc<RecordingStore>, config: PlaybackConfig) -> Self {
        let engine = MockEngine::new();
        let resolver = StaticResolver::new();
        let player = PlayerController::start(
            engine.clone(),
            resolver.clone(),
            store.clone(),
            config,
        )
        .await;

        Self {
            player,
            engine,
            resolver,
            store,
        }
    }

    pub fn current_id(&self) -> Option<TrackId> {
        self.player.snapshot().current_track.map(|track| track.id)
    }
}

/// Yield to spawned tasks until `condition` holds
pub async fn eventually(mut condition: impl FnMut() -> bool) {
    for _ in 0..1_000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}

/// Let spawned tasks drain their queues
pub async fn settle() {
    for _ in 0..100 {
        tokio::task::yield_now().await;
    }
}

/// Events received so far
pub fn drain(rx: &mut broadcast::Receiver<PlayerEvent>) -> Vec<PlayerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
