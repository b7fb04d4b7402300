//! Cache Statistics Module
//!
//! Tracks cache activity including hits, misses, expirations and evictions.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache activity counters and a size snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Accesses that returned a live node
    pub hits: u64,
    /// Accesses that found nothing (expired node or unknown key)
    pub misses: u64,
    /// Nodes deleted because their TTL elapsed
    pub expirations: u64,
    /// Nodes deleted to satisfy the size budget
    pub evictions: u64,
    /// Nodes linked by insert
    pub insertions: u64,
    /// Values rewritten in place by replace
    pub replacements: u64,
    /// Explicit deletes requested by the caller
    pub deletions: u64,
    /// Current number of linked nodes
    pub total_entries: usize,
    /// Current aggregate length of linked nodes
    pub current_size: i64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    pub fn record_replacement(&mut self) {
        self.replacements += 1;
    }

    pub fn record_deletion(&mut self) {
        self.deletions += 1;
    }

    // == Snapshot ==
    /// Copies the counters and fills in the size figures.
    pub fn snapshot(&self, total_entries: usize, current_size: i64) -> Self {
        Self {
            total_entries,
            current_size,
            ..self.clone()
        }
    }
}
