//! Bucketed Cache Module
//!
//! Packs many small key-value pairs into buckets persisted as single items
//! of a size-limited backing partition, spilling into new buckets on
//! overflow.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{BackingPartition, Bucket, PackingStats, PutOutcome};
use crate::error::CacheError;

/// Where a put into an existing bucket ended up.
enum Placement {
    Stored,
    /// The bucket overflowed and was rolled back; carries the value to retry
    Overflowed(Value),
    Rejected,
}

// == Bucketed Cache ==
/// Key-value cache spread over an ordered sequence of buckets.
///
/// Buckets are loaded from the partition as `cache0`, `cache1`, … and a key
/// lives in at most one of them. Puts never fail: overflow spills into a
/// fresh bucket and a pair too large for an empty bucket is dropped.
#[derive(Debug)]
pub struct BucketedCache<P> {
    /// System of record
    partition: P,
    /// Resident buckets, index `i` at position `i`
    buckets: Vec<Bucket>,
    /// Placement statistics
    stats: PackingStats,
}

impl<P: BackingPartition> BucketedCache<P> {
    // == Constructor ==
    /// Creates a cache over `partition` and loads its buckets.
    pub fn new(partition: P) -> Self {
        let mut cache = Self {
            partition,
            buckets: Vec::new(),
            stats: PackingStats::new(),
        };
        cache.reload();
        cache
    }

    // == Reload ==
    /// Discards resident buckets and reloads them from the partition.
    ///
    /// Loading stops at the first missing index. An unavailable partition
    /// leaves the cache empty.
    pub fn reload(&mut self) {
        self.buckets.clear();

        if !self.partition.is_available() {
            debug!(partition = self.partition.name(), "Partition unavailable, nothing to load");
            self.refresh_residency();
            return;
        }

        let mut index = 0;
        while let Some(entries) = self.partition.get(&Bucket::storage_key(index)) {
            debug!(
                partition = self.partition.name(),
                bucket = index,
                entries = entries.len(),
                "Loaded bucket"
            );
            self.buckets.push(Bucket::with_entries(index, entries));
            index += 1;
        }

        self.refresh_residency();
        info!(
            partition = self.partition.name(),
            buckets = self.buckets.len(),
            entries = self.stats.entries,
            "Reloaded buckets"
        );
    }

    // == Lookup ==
    /// Returns the index of the first bucket holding `key`.
    pub fn owner_of(&self, key: &str) -> Option<usize> {
        self.buckets.iter().position(|bucket| bucket.contains(key))
    }

    /// Returns true if any resident bucket holds `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.owner_of(key).is_some()
    }

    /// Returns the value for `key` from the first bucket holding it.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.buckets.iter().find_map(|bucket| bucket.get(key))
    }

    // == Put ==
    /// Inserts or updates `key`, returning the cache for chaining.
    ///
    /// An existing key is updated in the bucket that owns it; a new key goes
    /// to the last bucket. Nothing is stored when the partition is
    /// unavailable or the pair alone exceeds the item size limit.
    pub fn put(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        let key = key.into();

        if !self.partition.is_available() {
            debug!(
                partition = self.partition.name(),
                key = %key,
                "Partition unavailable, put skipped"
            );
            self.stats.record_skipped();
            return self;
        }

        match self.owner_of(&key) {
            Some(index) => self.update_in_place(index, key, value),
            None => self.insert_last(key, value),
        }

        self.refresh_residency();
        self
    }

    fn update_in_place(&mut self, index: usize, key: String, value: Value) {
        match self.place(index, &key, value) {
            Placement::Stored => self.stats.record_updated(),
            Placement::Overflowed(value) => {
                self.stats.record_overflow();
                if self.append_bucket(key, value) {
                    self.stats.record_updated();
                }
            }
            Placement::Rejected => self.stats.record_dropped(),
        }
    }

    fn insert_last(&mut self, key: String, value: Value) {
        let Some(last) = self.buckets.len().checked_sub(1) else {
            if self.append_bucket(key, value) {
                self.stats.record_stored();
            }
            return;
        };

        match self.place(last, &key, value) {
            Placement::Stored => self.stats.record_stored(),
            Placement::Overflowed(value) => {
                self.stats.record_overflow();
                if self.append_bucket(key, value) {
                    self.stats.record_stored();
                }
            }
            Placement::Rejected => self.stats.record_dropped(),
        }
    }

    /// Writes `key` into bucket `index` and persists it.
    ///
    /// On overflow the key is removed from the bucket and the bucket is
    /// persisted again without it. On rejection the previous in-memory
    /// state is restored, since nothing reached the partition.
    fn place(&mut self, index: usize, key: &str, value: Value) -> Placement {
        let bucket = &mut self.buckets[index];
        let previous = bucket.insert(key.to_string(), value);

        match self.partition.put(&bucket.key(), bucket) {
            PutOutcome::Stored => {
                debug!(partition = self.partition.name(), bucket = index, key, "Stored key");
                Placement::Stored
            }
            PutOutcome::Overflowed { size, limit } => {
                let error = CacheError::ItemSizeLimitExceeded {
                    key: key.to_string(),
                    size,
                    limit,
                };
                warn!(
                    partition = self.partition.name(),
                    bucket = index,
                    %error,
                    "Bucket overflow, spilling to a new bucket"
                );

                let Some(value) = bucket.remove(key) else {
                    return Placement::Rejected;
                };
                let restored = self.partition.put(&bucket.key(), bucket);
                if !restored.is_stored() {
                    warn!(
                        partition = self.partition.name(),
                        bucket = index,
                        outcome = ?restored,
                        "Rollback write failed"
                    );
                }
                Placement::Overflowed(value)
            }
            PutOutcome::Rejected(reason) => {
                match previous {
                    Some(previous) => {
                        bucket.insert(key.to_string(), previous);
                    }
                    None => {
                        bucket.remove(key);
                    }
                }
                warn!(
                    partition = self.partition.name(),
                    bucket = index,
                    key,
                    reason = %reason,
                    "Put rejected"
                );
                Placement::Rejected
            }
        }
    }

    /// Persists `key` alone in a new bucket at the end of the sequence.
    ///
    /// Returns false, leaving the sequence untouched, when the partition
    /// does not accept it.
    fn append_bucket(&mut self, key: String, value: Value) -> bool {
        let mut bucket = Bucket::new(self.buckets.len());
        bucket.insert(key.clone(), value);

        match self.partition.put(&bucket.key(), &bucket) {
            PutOutcome::Stored => {
                debug!(
                    partition = self.partition.name(),
                    bucket = bucket.index,
                    key = %key,
                    "Created bucket"
                );
                self.buckets.push(bucket);
                true
            }
            PutOutcome::Overflowed { size, limit } => {
                let error = CacheError::SingleItemTooLarge { key, size, limit };
                warn!(partition = self.partition.name(), %error, "Dropping item");
                self.stats.record_dropped();
                false
            }
            PutOutcome::Rejected(reason) => {
                warn!(
                    partition = self.partition.name(),
                    key = %key,
                    reason = %reason,
                    "Dropping item"
                );
                self.stats.record_dropped();
                false
            }
        }
    }

    fn refresh_residency(&mut self) {
        let entries = self.buckets.iter().map(Bucket::len).sum();
        self.stats.set_residency(self.buckets.len(), entries);
    }

    // == Inspection ==
    /// Resident buckets in index order.
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Total number of resident keys.
    pub fn len(&self) -> usize {
        self.stats.entries
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn partition(&self) -> &P {
        &self.partition
    }

    pub fn stats(&self) -> PackingStats {
        self.stats.clone()
    }
}
