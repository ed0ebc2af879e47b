//! Qasid Core
//!
//! Platform-agnostic core types, collaborator traits, and error handling for
//! the Qasid recitation and nasheed player.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackId`, `AudioReference`, `ProgressEntry`,
//!   `RepeatMode`, `ViewMode`
//! - **Collaborator Traits**: `StorageUrlResolver`, `KeyValueStore`
//! - **Error Handling**: Unified `QasidError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use qasid_core::types::{AudioReference, ProgressEntry, Track, TrackId};
//!
//! let track = Track::new(
//!     TrackId::recitation("7", 1),
//!     "Al-Fatihah",
//!     AudioReference::from_raw("https://server8.example.com/afs/001.mp3"),
//! )
//! .with_artist("Mishary Alafasy");
//!
//! assert_eq!(track.id.as_str(), "quran:7:1");
//! assert!(!track.audio.needs_resolution());
//!
//! let entry = ProgressEntry::new(60_000, 300_000);
//! assert!(entry.is_resumable());
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod storage;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{QasidError, Result};
pub use storage::KeyValueStore;
pub use traits::StorageUrlResolver;

pub use types::{
    AudioReference, ProgressEntry, ProgressMap, RepeatMode, Track, TrackId, ViewMode,
    FINISHED_RATIO, RESUME_MARGIN_MS,
};
