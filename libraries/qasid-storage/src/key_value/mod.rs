//! Key-value entries
//!
//! Opaque string values keyed by well-known names such as
//! `playback.progress`. Writes are last-write-wins upserts.
//!
//! # Example
//!
//! ```rust,no_run
//! use qasid_storage::key_value;
//! # async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//! key_value::set(pool, "playback.progress", "{}").await?;
//! let value = key_value::get(pool, "playback.progress").await?;
//! assert_eq!(value.as_deref(), Some("{}"));
//! # Ok(())
//! # }
//! ```

use sqlx::{Row, SqlitePool};

use crate::error::Result;

/// Get the value stored under `key`
///
/// Returns `Ok(None)` if the key was never written or has been removed
pub async fn get(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let row = sqlx::query("SELECT value FROM key_value WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| row.get::<String, _>("value")))
}

/// Insert or replace the value stored under `key`
pub async fn set(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO key_value (key, value, updated_at)
         VALUES (?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(value)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete `key`
///
/// Returns whether a row was removed
pub async fn remove(pool: &SqlitePool, key: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM key_value WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// List all keys, sorted
pub async fn keys(pool: &SqlitePool) -> Result<Vec<String>> {
    let rows = sqlx::query("SELECT key FROM key_value ORDER BY key")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| row.get::<String, _>("key"))
        .collect())
}
