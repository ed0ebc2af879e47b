//! Resumable listening progress
//!
//! The whole [`ProgressMap`] is persisted as one JSON blob under a single key.
//! Samples are throttled so the store sees at most one write per flush
//! interval while a track plays.

use qasid_core::{KeyValueStore, ProgressEntry, ProgressMap, TrackId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

/// What a throttled status sample does to the progress map
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressUpdate {
    /// Store this entry
    Save(ProgressEntry),
    /// Track is (nearly) finished; drop its entry
    Remove,
    /// Position or duration unknown; leave the map alone
    Skip,
}

impl ProgressUpdate {
    /// Classify a sample against the finished threshold
    pub fn from_sample(position_ms: u64, duration_ms: u64, finished_ratio: f64) -> Self {
        let entry = ProgressEntry::new(position_ms, duration_ms);
        match entry.ratio() {
            Some(ratio) if ratio >= finished_ratio => Self::Remove,
            _ if entry.is_meaningful() => Self::Save(entry),
            _ => Self::Skip,
        }
    }

    /// Apply to `map`, returning whether the map changed
    pub fn apply(self, map: &mut ProgressMap, track_id: &TrackId) -> bool {
        match self {
            Self::Save(entry) => map.insert(track_id.clone(), entry) != Some(entry),
            Self::Remove => map.remove(track_id).is_some(),
            Self::Skip => false,
        }
    }
}

/// Wall-clock gate for progress samples
///
/// The window opens when a session is installed, so the first sample is
/// taken one full interval into playback.
#[derive(Debug, Clone)]
pub struct ProgressThrottle {
    interval: Duration,
    window_start: Instant,
}

impl ProgressThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            window_start: Instant::now(),
        }
    }

    /// Open a new window starting now
    pub fn restart(&mut self) {
        self.window_start = Instant::now();
    }

    /// Whether a sample may be taken; consumes the window when it may
    pub fn ready(&mut self) -> bool {
        let now = Instant::now();
        if now.duration_since(self.window_start) >= self.interval {
            self.window_start = now;
            true
        } else {
            false
        }
    }
}

/// Result of deleting one saved entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// Nothing was saved for the track
    Missing,
    /// Entry deleted and the map persisted
    Cleared,
    /// Entry found but the write failed
    Failed,
}

/// Durable home of the progress map
pub struct ProgressStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
    write_lock: Mutex<()>,
}

impl ProgressStore {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the saved map
    ///
    /// Missing, unreadable or corrupt data yields an empty map.
    pub async fn load(&self) -> ProgressMap {
        let raw = match self.store.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No saved progress under {}", self.key);
                return ProgressMap::new();
            }
            Err(err) => {
                warn!("Failed to read saved progress: {}", err);
                return ProgressMap::new();
            }
        };

        match serde_json::from_str::<ProgressMap>(&raw) {
            Ok(map) => {
                debug!("Loaded {} progress entries", map.len());
                map
            }
            Err(err) => {
                warn!("Discarding corrupt saved progress: {}", err);
                ProgressMap::new()
            }
        }
    }

    /// Persist `map`, logging failures
    pub async fn save(&self, map: &ProgressMap) -> bool {
        let _guard = self.write_lock.lock().await;
        self.write(map).await
    }

    /// Persist the map returned by `snapshot`, taken after acquiring the write lock
    ///
    /// Concurrent writers therefore always store a map at least as new as the
    /// one stored before them.
    pub async fn save_latest<F>(&self, snapshot: F) -> bool
    where
        F: FnOnce() -> ProgressMap,
    {
        let _guard = self.write_lock.lock().await;
        let map = snapshot();
        self.write(&map).await
    }

    /// Delete the saved entry of `track_id`
    ///
    /// The stored map is read and rewritten under the write lock.
    pub async fn clear_entry(&self, track_id: &TrackId) -> ClearOutcome {
        let _guard = self.write_lock.lock().await;
        let mut map = self.load().await;
        if map.remove(track_id).is_none() {
            return ClearOutcome::Missing;
        }

        if self.write(&map).await {
            debug!("Deleted saved progress of {}", track_id);
            ClearOutcome::Cleared
        } else {
            ClearOutcome::Failed
        }
    }

    async fn write(&self, map: &ProgressMap) -> bool {
        let json = match serde_json::to_string(map) {
            Ok(json) => json,
            Err(err) => {
                warn!("Failed to serialize progress: {}", err);
                return false;
            }
        };

        match self.store.set(&self.key, &json).await {
            Ok(()) => true,
            Err(err) => {
                warn!("Failed to persist progress: {}", err);
                false
            }
        }
    }
}

impl std::fmt::Debug for ProgressStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressStore")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
