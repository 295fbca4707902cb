//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify the hot-cache bound, key normalization, and
//! counter bookkeeping over generated inputs.

use proptest::prelude::*;

use crate::cache::{CacheEntry, CacheKey, HotCache, ResolveStats};
use crate::provider::Lang;

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 50;
const TEST_TTL_SECS: u64 = 300;

// == Strategies ==
/// Generates coordinates on the 4-decimal grid with jitter small enough to
/// round back onto the same grid point. Jitter is kept non-negative so a
/// grid value of zero cannot flip to "-0.0000".
fn grid_coord_strategy() -> impl Strategy<Value = (f64, f64)> {
    (-900_000i32..=900_000i32, 0.0f64..0.000_049f64)
        .prop_map(|(grid, jitter)| (grid as f64 / 10_000.0, jitter))
}

fn lang_strategy() -> impl Strategy<Value = Lang> {
    prop_oneof![Just(Lang::Ar), Just(Lang::En)]
}

/// Stats events in the order the service records them.
#[derive(Debug, Clone)]
enum StatsOp {
    Hit,
    Miss,
    Dedup,
}

fn stats_op_strategy() -> impl Strategy<Value = StatsOp> {
    prop_oneof![
        Just(StatsOp::Hit),
        Just(StatsOp::Miss),
        Just(StatsOp::Dedup),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Jitter below the rounding precision always collapses onto the grid
    // point's key, for either language.
    #[test]
    fn prop_key_collapses_subprecision_jitter(
        (base, jitter) in grid_coord_strategy(),
        lang in lang_strategy(),
    ) {
        let exact = CacheKey::build(base, base, lang, 4);
        let jittered = CacheKey::build(base + jitter, base + jitter, lang, 4);
        prop_assert_eq!(exact, jittered);
    }

    // The hot cache never exceeds its bound, and after any overflow the
    // survivors are exactly the most recently written distinct keys.
    #[test]
    fn prop_hot_cache_bound_holds(extra in 1usize..100) {
        let mut hot = HotCache::new(TEST_MAX_ENTRIES, TEST_TTL_SECS);
        let total = TEST_MAX_ENTRIES + extra;

        for n in 0..total {
            let key = CacheKey::build(n as f64 / 10_000.0, 0.0, Lang::En, 4);
            hot.insert(key, CacheEntry::new(format!("addr {n}"), ""));
            prop_assert!(hot.len() <= TEST_MAX_ENTRIES);
        }

        prop_assert_eq!(hot.len(), TEST_MAX_ENTRIES);
        for n in 0..total {
            let key = CacheKey::build(n as f64 / 10_000.0, 0.0, Lang::En, 4);
            let retained = hot.get(&key).is_some();
            prop_assert_eq!(retained, n >= total - TEST_MAX_ENTRIES);
        }
    }

    // Counters add up: every event lands in exactly one counter, and
    // provider calls track misses one-for-one.
    #[test]
    fn prop_stats_bookkeeping(ops in prop::collection::vec(stats_op_strategy(), 0..100)) {
        let mut stats = ResolveStats::new();
        let mut hits = 0u64;
        let mut misses = 0u64;
        let mut dedups = 0u64;

        for op in ops {
            match op {
                StatsOp::Hit => { stats.record_hit(); hits += 1; }
                StatsOp::Miss => { stats.record_miss(); misses += 1; }
                StatsOp::Dedup => { stats.record_deduplicated(); dedups += 1; }
            }
        }

        prop_assert_eq!(stats.cache_hits, hits);
        prop_assert_eq!(stats.cache_misses, misses);
        prop_assert_eq!(stats.deduplicated, dedups);
        prop_assert_eq!(stats.total_requests, misses);
    }
}
