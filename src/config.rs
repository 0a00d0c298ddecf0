//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;

use crate::cache::NamespaceResolver;

/// Cache and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Per-item size limit of the backing partition, in bytes
    pub item_size_limit: usize,
    /// Namespace prefix for partition names, None falls back to "local"
    pub namespace: Option<String>,
    /// Base partition name, suffixed per scope
    pub partition_name: String,
    /// Whether the backing partitions accept reads and writes
    pub cache_enabled: bool,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `ITEM_SIZE_LIMIT` - Backing store per-item limit in bytes (default: 100000)
    /// - `CACHE_NAMESPACE` - Partition namespace prefix (default: unset)
    /// - `PARTITION_NAME` - Base partition name (default: "buckets")
    /// - `CACHE_ENABLED` - Enables the backing partitions (default: true)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            item_size_limit: env::var("ITEM_SIZE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.item_size_limit),
            namespace: env::var("CACHE_NAMESPACE")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            partition_name: env::var("PARTITION_NAME")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.partition_name),
            cache_enabled: env::var("CACHE_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_enabled),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            item_size_limit: 100_000,
            namespace: None,
            partition_name: "buckets".to_string(),
            cache_enabled: true,
            server_port: 3000,
        }
    }
}

impl NamespaceResolver for Config {
    fn resolve_prefix(&self) -> Option<String> {
        self.namespace.clone()
    }
}
