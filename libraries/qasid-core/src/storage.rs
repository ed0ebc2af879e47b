//! Durable key-value storage trait

use crate::error::Result;
use async_trait::async_trait;

/// Generic durable key-value store
///
/// Values are opaque strings (usually serialized JSON). The player keeps its
/// whole progress mapping under a single well-known key, so implementations
/// only need last-write-wins semantics per key.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    ///
    /// Returns `Ok(None)` when the key has never been written.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<()>;
}
