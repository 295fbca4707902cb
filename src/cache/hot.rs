//! Hot Cache Module
//!
//! In-process volatile map from normalized key to resolved address, with lazy
//! TTL checks on read and bulk-trim eviction on write.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::{CacheEntry, CacheKey};

// == Hot Cache ==
/// The fast path for all lookups.
///
/// Staleness is checked on read but stale entries are only physically removed
/// by the trim pass or [`remove_expired`](Self::remove_expired), so the read
/// path never pays write-path work. Eviction is a bulk trim: once
/// the size bound is exceeded, one pass retains the most recently written
/// `max_entries` entries rather than popping one per insert.
#[derive(Debug)]
pub struct HotCache {
    /// Key-value storage; the u64 is an insertion sequence number used to
    /// break timestamp ties when trimming
    entries: HashMap<CacheKey, (CacheEntry, u64)>,
    /// Monotonic insert counter
    seq: u64,
    /// Maximum number of entries retained after a trim pass
    max_entries: usize,
    /// Entry TTL in seconds
    ttl_secs: u64,
}

impl HotCache {
    // == Constructor ==
    /// Creates a hot cache with the given size bound and TTL.
    pub fn new(max_entries: usize, ttl_secs: u64) -> Self {
        Self {
            entries: HashMap::new(),
            seq: 0,
            max_entries,
            ttl_secs,
        }
    }

    // == Get ==
    /// Returns the entry for `key` if present and still within TTL.
    ///
    /// A stale entry is treated as absent but left in place; it keeps its
    /// slot until overwritten, swept, or trimmed.
    pub fn get(&self, key: &CacheKey) -> Option<&CacheEntry> {
        self.entries
            .get(key)
            .map(|(entry, _)| entry)
            .filter(|entry| !entry.is_expired(self.ttl_secs))
    }

    // == Insert ==
    /// Stores or overwrites an entry, then trims back to the size bound if
    /// the insert pushed the cache over it.
    pub fn insert(&mut self, key: CacheKey, entry: CacheEntry) {
        self.seq += 1;
        self.entries.insert(key, (entry, self.seq));
        self.trim_to_bound();
    }

    // == Trim ==
    /// Bulk eviction: keeps the `max_entries` most recently written entries,
    /// newest by timestamp with the insert sequence breaking ties.
    fn trim_to_bound(&mut self) {
        if self.entries.len() <= self.max_entries {
            return;
        }

        let mut by_recency: Vec<(CacheKey, i64, u64)> = self
            .entries
            .iter()
            .map(|(key, (entry, seq))| (key.clone(), entry.timestamp_ms, *seq))
            .collect();
        by_recency.sort_by(|a, b| (b.1, b.2).cmp(&(a.1, a.2)));

        let evicted: Vec<CacheKey> = by_recency
            .into_iter()
            .skip(self.max_entries)
            .map(|(key, _, _)| key)
            .collect();

        for key in &evicted {
            self.entries.remove(key);
        }
        debug!(evicted = evicted.len(), "hot cache trimmed to bound");
    }

    // == Remove Expired ==
    /// Removes all entries past TTL; used by the maintenance sweep.
    ///
    /// Returns the number of entries removed.
    pub fn remove_expired(&mut self) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl_secs;
        self.entries.retain(|_, (entry, _)| !entry.is_expired(ttl));
        before - self.entries.len()
    }

    // == Clear ==
    /// Drops every entry. Returns the number removed.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    // == Length ==
    /// Returns the current number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the key occupies a slot, regardless of staleness.
    #[cfg(test)]
    pub fn contains_slot(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }
}
