//! Cache Module
//!
//! Packs key-value pairs into buckets stored in a size-limited backing
//! partition, and unions an org and a session cache behind one facade.

mod bucket;
mod bucketed;
mod facade;
mod namespace;
mod partition;
mod stats;


// Re-export public types
pub use bucket::Bucket;
pub use bucketed::BucketedCache;
pub use facade::{FacadeStats, NamedCacheFacade};
pub use namespace::{Namespace, NamespaceResolver, PartitionScope, StaticNamespace};
pub use partition::{BackingPartition, MemoryPartition, PutOutcome};
pub use stats::PackingStats;

// == Public Constants ==
/// Prefix of bucket storage keys (`cache0`, `cache1`, ...)
pub const BUCKET_KEY_PREFIX: &str = "cache";

/// Namespace used when none is configured
pub const DEFAULT_NAMESPACE: &str = "local";
