//! Qasid - Playback Control
//!
//! Platform-agnostic playback control for the Qasid player.
//!
//! This crate provides:
//! - A single-session player controller (play, pause, seek, next, previous)
//! - Queue resolution for sequential, shuffle and repeat-one modes
//! - Auto-advance when a track finishes
//! - Resumable per-track progress, throttled and persisted
//! - Hidden / mini / full view-mode tracking
//!
//! # Architecture
//!
//! `qasid-playback` does not decode audio. Platform code provides:
//! - [`PlaybackEngine`] / [`EngineHandle`]: load and drive media
//! - [`StorageUrlResolver`](qasid_core::StorageUrlResolver): turn storage
//!   paths into playable URLs
//! - [`KeyValueStore`](qasid_core::KeyValueStore): persist progress
//!
//! UI layers observe the controller through [`PlayerController::subscribe`]
//! and [`PlayerController::snapshot`].
//!
//! # Example
//!
//! ```rust,no_run
//! use qasid_core::{AudioReference, KeyValueStore, StorageUrlResolver, Track, TrackId};
//! use qasid_playback::{PlaybackConfig, PlaybackEngine, PlayerController};
//! use std::sync::Arc;
//!
//! # async fn example(
//! #     engine: Arc<dyn PlaybackEngine>,
//! #     resolver: Arc<dyn StorageUrlResolver>,
//! #     store: Arc<dyn KeyValueStore>,
//! # ) -> qasid_playback::Result<()> {
//! let player = PlayerController::start(engine, resolver, store, PlaybackConfig::default()).await;
//!
//! let track = Track::new(
//!     TrackId::recitation("7", 1),
//!     "Al-Fatihah",
//!     AudioReference::from_raw("https://server8.example.com/afs/001.mp3"),
//! );
//! player.set_queue(vec![track.clone()]);
//! player.play_track(track, None).await?;
//!
//! player.toggle_play_pause().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod controller;
pub mod engine;
pub mod error;
pub mod events;
pub mod progress;
pub mod queue;
pub mod session;
pub mod shuffle;
pub mod types;
pub mod view;

pub use controller::PlayerController;
pub use engine::{EngineHandle, EngineStatus, LoadOptions, PlaybackEngine, StatusListener};
pub use error::{PlaybackError, Result};
pub use events::PlayerEvent;
pub use progress::{ClearOutcome, ProgressStore, ProgressThrottle, ProgressUpdate};
pub use queue::{resolve_next, resolve_previous, Resolution};
pub use session::PlaybackSession;
pub use types::{PlaybackConfig, PlayerSnapshot, SessionToken, DEFAULT_PROGRESS_KEY};
