//! Bucket Cache - A caching facade over size-limited backing partitions
//!
//! Packs many small key-value pairs into bucket items so callers never see
//! the backing store's per-item size limit.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use api::AppState;
pub use cache::{BackingPartition, BucketedCache, MemoryPartition, NamedCacheFacade};
pub use config::Config;
pub use error::CacheError;
