//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::PartitionScope;

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: Value,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for the scoped put operations (PUT /org, PUT /session)
///
/// Puts are best effort, so `stored` reports whether the key is present in
/// the scope afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct PutResponse {
    /// The key that was put
    pub key: String,
    /// Scope the key was put into
    pub scope: PartitionScope,
    /// Whether the scope holds the key after the put
    pub stored: bool,
    /// Bucket holding the key, if stored
    pub bucket: Option<usize>,
}

impl PutResponse {
    /// Creates a new PutResponse
    pub fn new(key: impl Into<String>, scope: PartitionScope, bucket: Option<usize>) -> Self {
        Self {
            key: key.into(),
            scope,
            stored: bucket.is_some(),
            bucket,
        }
    }
}

/// Response body for the membership check (GET /contains/:key)
#[derive(Debug, Clone, Serialize)]
pub struct ContainsResponse {
    pub key: String,
    pub present: bool,
}

impl ContainsResponse {
    pub fn new(key: impl Into<String>, present: bool) -> Self {
        Self {
            key: key.into(),
            present,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
