//! Property-Based Tests for the Cache Engine
//!
//! Uses proptest to verify the engine contract over arbitrary operation
//! sequences.

use proptest::prelude::*;
use std::collections::HashSet;
use std::time::Duration;

use crate::cache::{CacheKind, FileCache};
use crate::config::CacheConfig;

// == Test Configuration ==
const TEST_TTL: Duration = Duration::from_secs(300);
const TEST_MAX_ENTRIES: usize = 25;

fn ttl_cache() -> FileCache<String, String> {
    FileCache::new(CacheConfig::new(CacheKind::Generic).with_ttl(TEST_TTL)).unwrap()
}

fn bounded_cache() -> FileCache<String, String> {
    FileCache::new(CacheConfig::new(CacheKind::Generic).with_max_entries(TEST_MAX_ENTRIES))
        .unwrap()
}

// == Strategies ==
/// Generates cache identifiers from a small alphabet so op sequences revisit
/// keys often enough to exercise the insert-if-absent path.
fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-f0-9]{1,8}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,64}".prop_map(|s| s)
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: String, value: String },
    Get { key: String },
    Evict { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (identifier_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Put { key, value }),
        identifier_strategy().prop_map(|key| CacheOp::Get { key }),
        identifier_strategy().prop_map(|key| CacheOp::Evict { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any key-value pair, a put into a fresh cache followed by a get
    // returns the exact value that was stored.
    #[test]
    fn prop_roundtrip_storage(key in identifier_strategy(), value in value_strategy()) {
        let cache = ttl_cache();

        cache.put(key.clone(), value.clone());
        prop_assert_eq!(cache.get(&key), Some(value));
    }

    // For any key, the first value put wins; later puts on the same key are
    // dropped silently.
    #[test]
    fn prop_first_writer_wins(
        key in identifier_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let cache = ttl_cache();

        cache.put(key.clone(), value1.clone());
        cache.put(key.clone(), value2);

        prop_assert_eq!(cache.get(&key), Some(value1));
        prop_assert_eq!(cache.len(), 1);
    }

    // For any key that exists, after an evict a get returns absent and a
    // presence check is negative.
    #[test]
    fn prop_evict_removes_entry(key in identifier_strategy(), value in value_strategy()) {
        let cache = ttl_cache();

        cache.put(key.clone(), value);
        prop_assert!(cache.contains(&key));

        cache.evict(&key);
        prop_assert!(!cache.contains(&key));
        prop_assert_eq!(cache.get(&key), None);
    }

    // For any operation sequence, a presence check mirrors the set of keys
    // inserted and not yet evicted, and hit/miss counters track gets exactly.
    #[test]
    fn prop_presence_and_stats_match_a_shadow_model(
        ops in prop::collection::vec(cache_op_strategy(), 1..60)
    ) {
        let cache = ttl_cache();
        let mut present: HashSet<String> = HashSet::new();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Put { key, value } => {
                    cache.put(key.clone(), value);
                    present.insert(key);
                }
                CacheOp::Get { key } => {
                    if present.contains(&key) {
                        expected_hits += 1;
                        prop_assert!(cache.get(&key).is_some());
                    } else {
                        expected_misses += 1;
                        prop_assert!(cache.get(&key).is_none());
                    }
                }
                CacheOp::Evict { key } => {
                    cache.evict(&key);
                    present.remove(&key);
                }
            }
        }

        for key in &present {
            prop_assert!(cache.contains(key));
        }
        prop_assert_eq!(cache.len(), present.len());
        prop_assert_eq!(cache.stats().hits(), expected_hits);
        prop_assert_eq!(cache.stats().misses(), expected_misses);
    }

    // For any operation sequence under the size-bound policy, a maintenance
    // pass leaves the cache at or below the threshold (by clearing it
    // entirely when it was above).
    #[test]
    fn prop_size_policy_bounds_entry_count_after_flush(
        ops in prop::collection::vec(cache_op_strategy(), 1..120)
    ) {
        let cache = bounded_cache();

        for op in ops {
            match op {
                CacheOp::Put { key, value } => cache.put(key, value),
                CacheOp::Get { key } => {
                    let _ = cache.get(&key);
                }
                CacheOp::Evict { key } => cache.evict(&key),
            }
        }

        let above = cache.len() > TEST_MAX_ENTRIES;
        let removed = cache.flush();

        prop_assert!(cache.len() <= TEST_MAX_ENTRIES);
        if above {
            prop_assert!(removed > 0);
            prop_assert!(cache.is_empty());
        } else {
            prop_assert_eq!(removed, 0);
        }
    }

    // For any set of fresh entries, a TTL maintenance pass removes nothing
    // while they are younger than the TTL.
    #[test]
    fn prop_young_entries_survive_ttl_flush(
        entries in prop::collection::hash_map(identifier_strategy(), value_strategy(), 1..20)
    ) {
        let cache = ttl_cache();

        for (key, value) in &entries {
            cache.put(key.clone(), value.clone());
        }

        prop_assert_eq!(cache.flush(), 0);
        for key in entries.keys() {
            prop_assert!(cache.contains(key));
        }
    }
}
