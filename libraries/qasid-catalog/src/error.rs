//! Error types for catalog mapping and URL resolution.

use qasid_core::QasidError;
use thiserror::Error;

/// Errors that can occur when talking to object storage.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Storage returned an error response
    #[error("Storage error ({status}): {message}")]
    Status { status: u16, message: String },

    /// Object does not exist
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Object exists but has no download token
    #[error("Object has no download token: {0}")]
    MissingToken(String),

    /// Invalid endpoint or bucket
    #[error("Invalid storage URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse storage response
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl From<CatalogError> for QasidError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Request(e) => QasidError::network(e.to_string()),
            CatalogError::NotFound(path) => QasidError::not_found("object", path),
            CatalogError::InvalidUrl(msg) => QasidError::invalid_input(msg),
            other => QasidError::Other(other.to_string()),
        }
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
