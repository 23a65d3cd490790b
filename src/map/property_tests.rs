//! Property-Based Tests for Map Module
//!
//! Uses proptest to check the map against a plain `HashMap` model and the
//! sweep against a model of entry ages.

use proptest::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

use tokio::runtime::{Builder, Runtime};

use crate::map::ExpiryMap;

// == Test Configuration ==
/// Long enough that nothing expires during a test case
const TEST_LONG: Duration = Duration::from_secs(3600);

// == Strategies ==
/// Small key space so operations collide often
fn key_strategy() -> impl Strategy<Value = u8> {
    0u8..16
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,32}".prop_map(|s| s)
}

/// Generates a sequence of map operations for testing
#[derive(Debug, Clone)]
enum MapOp {
    Set { key: u8, value: String },
    Get { key: u8 },
    Delete { key: u8 },
    Clear,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        4 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| MapOp::Set { key, value }),
        3 => key_strategy().prop_map(|key| MapOp::Get { key }),
        2 => key_strategy().prop_map(|key| MapOp::Delete { key }),
        1 => Just(MapOp::Clear),
    ]
}

fn test_runtime() -> Runtime {
    Runtime::new().unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Without expiry in play the map behaves exactly like a HashMap.
    #[test]
    fn prop_matches_hashmap_model(ops in prop::collection::vec(map_op_strategy(), 1..100)) {
        let rt = test_runtime();
        let map = ExpiryMap::with_runtime(rt.handle(), TEST_LONG, TEST_LONG).unwrap();
        let mut model: HashMap<u8, String> = HashMap::new();

        for op in ops {
            match op {
                MapOp::Set { key, value } => {
                    map.set(key, value.clone());
                    model.insert(key, value);
                }
                MapOp::Get { key } => {
                    prop_assert_eq!(map.get(&key), model.get(&key).cloned());
                }
                MapOp::Delete { key } => {
                    prop_assert_eq!(map.delete(&key), model.remove(&key));
                }
                MapOp::Clear => {
                    map.clear();
                    model.clear();
                }
            }
            prop_assert_eq!(map.len(), model.len());
        }

        let iterated: HashMap<u8, String> = map
            .iter()
            .iter()
            .map(|(k, v)| (*k, v.clone()))
            .collect();
        prop_assert_eq!(iterated, model);
    }

    // Hits and misses count every get, in any interleaving.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(map_op_strategy(), 1..50)) {
        let rt = test_runtime();
        let map = ExpiryMap::with_runtime(rt.handle(), TEST_LONG, TEST_LONG).unwrap();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                MapOp::Set { key, value } => map.set(key, value),
                MapOp::Get { key } => match map.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                MapOp::Delete { key } => {
                    map.delete(&key);
                }
                MapOp::Clear => map.clear(),
            }
        }

        let stats = map.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.total_entries, map.len(), "Total entries mismatch");
    }
}

// Fewer cases: each one builds a paused runtime
proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    // A sweep keeps exactly the keys whose last write is within the expiry delay.
    #[test]
    fn prop_sweep_keeps_only_recent_writes(
        writes in prop::collection::vec((key_strategy(), 0u64..1000), 1..40)
    ) {
        let rt = Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();

        // Ages are whole milliseconds, so no age lands on the boundary
        let expiry_delay = Duration::from_micros(500_500);
        let end_ms = 1000u64;

        let mut writes = writes;
        writes.sort_by_key(|(_, at_ms)| *at_ms);

        let mut last_write: HashMap<u8, u64> = HashMap::new();
        for (key, at_ms) in &writes {
            last_write.insert(*key, *at_ms);
        }

        let survivors = rt.block_on(async {
            let map = ExpiryMap::new(expiry_delay, TEST_LONG).unwrap();
            let mut now_ms = 0u64;

            for (key, at_ms) in &writes {
                tokio::time::advance(Duration::from_millis(at_ms - now_ms)).await;
                now_ms = *at_ms;
                map.set(*key, *at_ms);
            }
            tokio::time::advance(Duration::from_millis(end_ms - now_ms)).await;

            map.purge_expired();
            let mut keys: Vec<u8> = map.iter().iter().map(|(k, _)| *k).collect();
            keys.sort_unstable();
            keys
        });

        let mut expected: Vec<u8> = last_write
            .into_iter()
            .filter(|(_, at_ms)| end_ms - at_ms <= 500)
            .map(|(key, _)| key)
            .collect();
        expected.sort_unstable();

        prop_assert_eq!(survivors, expected);
    }
}
