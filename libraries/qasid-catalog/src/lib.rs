//! Qasid Catalog
//!
//! Bridges catalog records and the player:
//!
//! - **Queue building**: reciters and nasheeds become [`Track`](qasid_core::Track)
//!   lists with canonical composite ids (`quran:<reciter>:<surah>`,
//!   `nasheed:<id>`)
//! - **URL resolution**: [`FirebaseStorageResolver`] implements
//!   [`StorageUrlResolver`](qasid_core::StorageUrlResolver) for
//!   storage-relative audio paths

pub mod error;
pub mod queue;
pub mod resolver;
pub mod surahs;
pub mod types;

pub use error::{CatalogError, Result};
pub use queue::{nasheed_queue, nasheed_track, parse_surah_list, reciter_queue, surah_track};
pub use resolver::{FirebaseStorageResolver, DEFAULT_ENDPOINT};
pub use surahs::{surah_name, surah_title, SURAH_COUNT};
pub use types::{Moshaf, Nasheed, NasheedKind, Reciter};
