//! Bucket Module
//!
//! Defines the unit of storage persisted as one backing partition item.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::cache::BUCKET_KEY_PREFIX;

// == Bucket ==
/// A group of key-value pairs persisted together under one storage key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bucket {
    /// Position of the bucket in the sequence
    pub index: usize,
    /// Packed key-value pairs
    pub entries: BTreeMap<String, Value>,
}

impl Bucket {
    // == Constructor ==
    /// Creates an empty bucket at the given index.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            entries: BTreeMap::new(),
        }
    }

    /// Rebuilds a bucket from entries loaded out of the backing partition.
    pub fn with_entries(index: usize, entries: BTreeMap<String, Value>) -> Self {
        Self { index, entries }
    }

    // == Storage Key ==
    /// Returns the partition key for a bucket index, e.g. `cache0`.
    pub fn storage_key(index: usize) -> String {
        format!("{}{}", BUCKET_KEY_PREFIX, index)
    }

    /// Returns the partition key this bucket is persisted under.
    pub fn key(&self) -> String {
        Self::storage_key(self.index)
    }

    // == Serialized Size ==
    /// Returns the byte length of the bucket's JSON encoding.
    ///
    /// This is the size the backing partition checks against its limit.
    pub fn serialized_size(&self) -> usize {
        serde_json::to_vec(&self.entries)
            .map(|bytes| bytes.len())
            .unwrap_or(usize::MAX)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Inserts a pair, returning the value it replaced.
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.entries.insert(key, value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
