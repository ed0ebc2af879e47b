//! Qasid Storage
//!
//! Durable key-value persistence for the Qasid player.
//!
//! The playback core only needs a generic get/set store (it keeps the whole
//! progress mapping under one key), so this crate provides:
//!
//! - **`SqliteKeyValueStore`**: `SQLite`-backed store with embedded migrations
//! - **`MemoryKeyValueStore`**: process-local store for tests and ephemeral sessions
//!
//! # Example
//!
//! ```rust,no_run
//! use qasid_storage::{create_pool, run_migrations, SqliteKeyValueStore};
//! use qasid_core::KeyValueStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://qasid.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqliteKeyValueStore::new(pool);
//! store.set("playback.progress", "{}").await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;
mod memory;

// Vertical slices
pub mod key_value;

pub use context::SqliteKeyValueStore;
pub use error::StorageError;
pub use memory::MemoryKeyValueStore;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://qasid.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(url = %database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::info!(url = %database_url, "SQLite pool ready");

    Ok(pool)
}
