//! Error types for the bucket cache
//!
//! Provides unified error handling using thiserror. The cache-specific
//! variants describe outcomes that are recovered internally and only ever
//! reach logs; the request variants are surfaced by the HTTP layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the bucket cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Backing partition is disabled or not provisioned
    #[error("Partition unavailable: {0}")]
    PartitionUnavailable(String),

    /// A bucket grew past the backing store's per-item limit
    #[error("Bucket for key '{key}' exceeds item size limit ({size} > {limit} bytes)")]
    ItemSizeLimitExceeded {
        key: String,
        size: usize,
        limit: usize,
    },

    /// A lone key/value pair does not fit in an empty bucket
    #[error("Key '{key}' is too large for a single bucket ({size} > {limit} bytes)")]
    SingleItemTooLarge {
        key: String,
        size: usize,
        limit: usize,
    },

    /// Bucket contents could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key not found in any scope
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::PartitionUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::ItemSizeLimitExceeded { .. } | CacheError::SingleItemTooLarge { .. } => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            CacheError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the bucket cache.
pub type Result<T> = std::result::Result<T, CacheError>;
