//! Packing Statistics Module
//!
//! Tracks how puts were placed: stored, updated, spilled, dropped or skipped.

use serde::Serialize;

// == Packing Stats ==
/// Counters describing bucket placement for one cache instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackingStats {
    /// New keys persisted
    pub stored: u64,
    /// Existing keys persisted with a new value
    pub updated: u64,
    /// Puts that overflowed their target bucket and spilled to a new one
    pub overflows: u64,
    /// Pairs dropped because they do not fit in an empty bucket
    pub dropped: u64,
    /// Puts ignored because the partition was unavailable
    pub skipped: u64,
    /// Resident buckets
    pub buckets: usize,
    /// Resident keys across all buckets
    pub entries: usize,
}

impl PackingStats {
    // == Constructor ==
    /// Creates a new PackingStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Fill Ratio ==
    /// Average number of keys per bucket, or 0.0 with no buckets.
    pub fn keys_per_bucket(&self) -> f64 {
        if self.buckets == 0 {
            0.0
        } else {
            self.entries as f64 / self.buckets as f64
        }
    }

    pub fn record_stored(&mut self) {
        self.stored += 1;
    }

    pub fn record_updated(&mut self) {
        self.updated += 1;
    }

    pub fn record_overflow(&mut self) {
        self.overflows += 1;
    }

    pub fn record_dropped(&mut self) {
        self.dropped += 1;
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    // == Update Residency ==
    /// Updates the resident bucket and key totals.
    pub fn set_residency(&mut self, buckets: usize, entries: usize) {
        self.buckets = buckets;
        self.entries = entries;
    }
}
