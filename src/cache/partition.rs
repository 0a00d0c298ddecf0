//! Backing Partition Module
//!
//! The size-limited store that buckets are persisted into, plus an
//! in-memory implementation used by the server and the tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::debug;

use crate::cache::Bucket;
use crate::error::{CacheError, Result};

// == Put Outcome ==
/// Result of persisting one bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome {
    /// The bucket was written
    Stored,
    /// The encoded bucket is larger than the per-item limit
    Overflowed { size: usize, limit: usize },
    /// The partition refused the write for another reason
    Rejected(String),
}

impl PutOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, PutOutcome::Stored)
    }
}

// == Backing Partition ==
/// A key-value store that refuses single items above a fixed size.
pub trait BackingPartition {
    /// Qualified partition name, used in logs
    fn name(&self) -> &str;

    /// Whether the partition currently accepts reads and writes
    fn is_available(&self) -> bool;

    /// Loads the entries persisted under `key`, if any.
    fn get(&self, key: &str) -> Option<BTreeMap<String, Value>>;

    /// Persists a bucket under `key`.
    fn put(&self, key: &str, bucket: &Bucket) -> PutOutcome;
}

// == Memory Partition ==
/// In-memory partition holding JSON-encoded buckets.
///
/// Clones share the same storage, so several caches built over clones of
/// one partition see the same system of record.
#[derive(Debug, Clone)]
pub struct MemoryPartition {
    name: String,
    item_size_limit: usize,
    available: Arc<AtomicBool>,
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryPartition {
    // == Constructor ==
    /// Creates an available, empty partition.
    ///
    /// # Arguments
    /// * `name` - Qualified partition name
    /// * `item_size_limit` - Largest encoded item accepted, in bytes
    pub fn new(name: impl Into<String>, item_size_limit: usize) -> Self {
        Self {
            name: name.into(),
            item_size_limit,
            available: Arc::new(AtomicBool::new(true)),
            items: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Deletes the item stored under `key`.
    pub fn remove(&self, key: &str) {
        self.write_items().remove(key);
    }

    /// Enables or disables the partition for every clone.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Returns the persisted JSON stored under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.read_items().get(key).cloned()
    }

    /// Number of persisted items.
    pub fn len(&self) -> usize {
        self.read_items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_items().is_empty()
    }

    fn read_items(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, String>> {
        self.items.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_items(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, String>> {
        self.items.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Encodes bucket entries the way they are persisted.
fn encode(bucket: &Bucket) -> Result<String> {
    Ok(serde_json::to_string(&bucket.entries)?)
}

fn decode(raw: &str) -> Result<BTreeMap<String, Value>> {
    Ok(serde_json::from_str(raw)?)
}

impl BackingPartition for MemoryPartition {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn get(&self, key: &str) -> Option<BTreeMap<String, Value>> {
        if !self.is_available() {
            return None;
        }
        let items = self.read_items();
        let raw = items.get(key)?;
        match decode(raw) {
            Ok(entries) => Some(entries),
            Err(err) => {
                debug!(partition = %self.name, key, error = %err, "Unreadable item ignored");
                None
            }
        }
    }

    fn put(&self, key: &str, bucket: &Bucket) -> PutOutcome {
        if !self.is_available() {
            return PutOutcome::Rejected(
                CacheError::PartitionUnavailable(self.name.clone()).to_string(),
            );
        }

        let encoded = match encode(bucket) {
            Ok(encoded) => encoded,
            Err(err) => return PutOutcome::Rejected(err.to_string()),
        };

        if encoded.len() > self.item_size_limit {
            return PutOutcome::Overflowed {
                size: encoded.len(),
                limit: self.item_size_limit,
            };
        }

        self.write_items().insert(key.to_string(), encoded);
        PutOutcome::Stored
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bucket_with(index: usize, pairs: &[(&str, Value)]) -> Bucket {
        let mut bucket = Bucket::new(index);
        for (key, value) in pairs {
            bucket.insert(key.to_string(), value.clone());
        }
        bucket
    }

    #[test]
    fn test_put_and_get() {
        let partition = MemoryPartition::new("local.test", 1024);
        let bucket = bucket_with(0, &[("a", json!(1)), ("b", json!("two"))]);

        assert_eq!(partition.put("cache0", &bucket), PutOutcome::Stored);

        let loaded = partition.get("cache0").unwrap();
        assert_eq!(loaded, bucket.entries);
        assert_eq!(partition.raw("cache0").unwrap(), r#"{"a":1,"b":"two"}"#);
    }

    #[test]
    fn test_get_missing_key() {
        let partition = MemoryPartition::new("local.test", 1024);
        assert!(partition.get("cache0").is_none());
    }

    #[test]
    fn test_put_over_limit_overflows() {
        let partition = MemoryPartition::new("local.test", 10);
        let bucket = bucket_with(0, &[("key", json!("a long value"))]);

        let outcome = partition.put("cache0", &bucket);
        assert!(matches!(outcome, PutOutcome::Overflowed { limit: 10, .. }));
        assert!(partition.is_empty());
    }

    #[test]
    fn test_put_exactly_at_limit_is_stored() {
        // {"a":"b"} is 9 bytes
        let partition = MemoryPartition::new("local.test", 9);
        let bucket = bucket_with(0, &[("a", json!("b"))]);

        assert!(partition.put("cache0", &bucket).is_stored());
    }

    #[test]
    fn test_unavailable_partition() {
        let partition = MemoryPartition::new("local.test", 1024);
        let bucket = bucket_with(0, &[("a", json!(1))]);
        partition.put("cache0", &bucket);

        partition.set_available(false);

        assert!(!partition.is_available());
        assert!(partition.get("cache0").is_none());
        assert!(matches!(
            partition.put("cache1", &bucket),
            PutOutcome::Rejected(_)
        ));
    }

    #[test]
    fn test_clones_share_storage() {
        let partition = MemoryPartition::new("local.test", 1024);
        let clone = partition.clone();

        partition.put("cache0", &bucket_with(0, &[("a", json!(1))]));
        assert!(clone.get("cache0").is_some());

        clone.remove("cache0");
        assert!(partition.get("cache0").is_none());
        assert_eq!(partition.len(), 0);
    }
}
