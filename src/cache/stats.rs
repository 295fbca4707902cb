//! Cache Statistics Module
//!
//! Tracks resolution counters for operational visibility. Diagnostic only;
//! nothing here participates in cache correctness.

use serde::Serialize;

// == Resolve Stats ==
/// Monotonic counters over the life of a cache instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolveStats {
    /// Provider calls actually issued
    pub total_requests: u64,
    /// Lookups served from the hot cache
    pub cache_hits: u64,
    /// Lookups that required a new provider call
    pub cache_misses: u64,
    /// Lookups that attached to an already in-flight request
    pub deduplicated: u64,
}

impl ResolveStats {
    // == Constructor ==
    /// Creates stats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.cache_hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter together with the provider-call counter;
    /// a genuine miss is exactly the moment a new upstream call is issued.
    pub fn record_miss(&mut self) {
        self.cache_misses += 1;
        self.total_requests += 1;
    }

    // == Record Deduplicated ==
    /// Increments the dedup counter for a caller that piggybacked on an
    /// existing in-flight request.
    pub fn record_deduplicated(&mut self) {
        self.deduplicated += 1;
    }

    // == Reset ==
    /// Zeroes all counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 before any lookups.
    pub fn hit_rate(&self) -> f64 {
        let settled = self.cache_hits + self.cache_misses;
        if settled == 0 {
            0.0
        } else {
            self.cache_hits as f64 / settled as f64
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = ResolveStats::new();
        assert_eq!(stats.total_requests, 0);
        assert_eq!(stats.cache_hits, 0);
        assert_eq!(stats.cache_misses, 0);
        assert_eq!(stats.deduplicated, 0);
    }

    #[test]
    fn test_miss_counts_provider_call() {
        let mut stats = ResolveStats::new();
        stats.record_miss();
        stats.record_miss();
        assert_eq!(stats.cache_misses, 2);
        assert_eq!(stats.total_requests, 2);
    }

    #[test]
    fn test_hit_and_dedup_do_not_count_provider_calls() {
        let mut stats = ResolveStats::new();
        stats.record_hit();
        stats.record_deduplicated();
        assert_eq!(stats.total_requests, 0);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.deduplicated, 1);
    }

    #[test]
    fn test_reset() {
        let mut stats = ResolveStats::new();
        stats.record_hit();
        stats.record_miss();
        stats.record_deduplicated();

        stats.reset();
        assert_eq!(stats, ResolveStats::new());
    }

    #[test]
    fn test_hit_rate_no_lookups() {
        assert_eq!(ResolveStats::new().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = ResolveStats::new();
        stats.record_hit();
        stats.record_miss();
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }
}
