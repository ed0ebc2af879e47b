//! Object-storage URL resolution over the Firebase Storage REST API.

use crate::error::{CatalogError, Result};
use async_trait::async_trait;
use qasid_core::{QasidError, StorageUrlResolver};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default public endpoint
pub const DEFAULT_ENDPOINT: &str = "https://firebasestorage.googleapis.com";

#[derive(Debug, Deserialize)]
struct ObjectMetadata {
    /// Comma-separated download tokens
    #[serde(rename = "downloadTokens", default)]
    download_tokens: Option<String>,
}

/// Resolves storage paths to tokenized download URLs.
///
/// Each call fetches the object's metadata and builds
/// `<endpoint>/v0/b/<bucket>/o/<encoded path>?alt=media&token=<token>`.
/// Nothing is cached; tokens can be revoked at any time.
///
/// # Example
///
/// ```ignore
/// use qasid_catalog::FirebaseStorageResolver;
/// use qasid_core::StorageUrlResolver;
///
/// let resolver = FirebaseStorageResolver::new(
///     "https://firebasestorage.googleapis.com",
///     "qasid-app.appspot.com",
/// )?;
/// let url = resolver.resolve("nasheeds/tala-al-badru.mp3").await?;
/// ```
#[derive(Debug, Clone)]
pub struct FirebaseStorageResolver {
    http: Client,
    endpoint: Url,
    bucket: String,
}

impl FirebaseStorageResolver {
    /// Create a resolver for `bucket` served from `endpoint`.
    pub fn new(endpoint: &str, bucket: &str) -> Result<Self> {
        let bucket = bucket.trim();
        if bucket.is_empty() {
            return Err(CatalogError::InvalidUrl("bucket cannot be empty".into()));
        }

        let endpoint = endpoint.trim().trim_end_matches('/');
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(CatalogError::InvalidUrl(
                "endpoint must start with http:// or https://".into(),
            ));
        }
        let endpoint =
            Url::parse(endpoint).map_err(|e| CatalogError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Qasid/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            bucket: bucket.to_string(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Metadata URL of the object at `path`
    pub fn object_url(&self, path: &str) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidUrl(self.endpoint.to_string()))?
            .pop_if_empty()
            .extend(["v0", "b", self.bucket.as_str(), "o"])
            .push(path.trim().trim_start_matches('/'));
        Ok(url)
    }

    /// Fetch a download URL for the object at `path`
    pub async fn download_url(&self, path: &str) -> Result<String> {
        let url = self.object_url(path)?;
        debug!("Fetching storage metadata for {}", path);

        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let metadata: ObjectMetadata = response
            .json()
            .await
            .map_err(|e| CatalogError::ParseError(format!("Invalid object metadata: {}", e)))?;

        let token = metadata
            .download_tokens
            .as_deref()
            .and_then(|tokens| tokens.split(',').map(str::trim).find(|t| !t.is_empty()))
            .ok_or_else(|| CatalogError::MissingToken(path.to_string()))?;

        let mut download = url;
        download
            .query_pairs_mut()
            .append_pair("alt", "media")
            .append_pair("token", token);
        Ok(download.into())
    }
}

#[async_trait]
impl StorageUrlResolver for FirebaseStorageResolver {
    async fn resolve(&self, relative_path: &str) -> qasid_core::Result<String> {
        self.download_url(relative_path).await.map_err(|e| {
            warn!("Failed to resolve {}: {}", relative_path, e);
            QasidError::resolution(relative_path, e.to_string())
        })
    }
}
