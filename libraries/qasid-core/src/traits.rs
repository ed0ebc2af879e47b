/// Collaborator traits consumed by the player
use crate::error::Result;
use async_trait::async_trait;

/// Object-storage URL resolver
///
/// Turns a storage-relative audio or image path into a time-limited URL the
/// platform media engine can stream. Resolved URLs are not assumed to be
/// stable, so callers resolve again every time they load a track.
///
/// # Errors
/// Network or permission failures are reported as
/// [`QasidError::Resolution`](crate::QasidError::Resolution).
#[async_trait]
pub trait StorageUrlResolver: Send + Sync {
    /// Resolve `relative_path` to a playable URL
    async fn resolve(&self, relative_path: &str) -> Result<String>;
}
