//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check store invariants. Time is driven by a
//! `ManualClock`, so expiry cases run without sleeping.

use std::collections::HashMap;
use std::sync::Arc;

use proptest::prelude::*;

use crate::cache::{CacheStore, NO_TTL};
use crate::clock::ManualClock;

// == Helpers ==
fn store_with_clock() -> (CacheStore<String>, ManualClock) {
    let clock = ManualClock::default();
    (CacheStore::with_clock(Arc::new(clock.clone())), clock)
}

// == Strategies ==
/// Colon-delimited keys drawn from a small alphabet so prefixes overlap
fn key_strategy() -> impl Strategy<Value = String> {
    "(accounts|analytics|user):[0-9]{1,3}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,64}".prop_map(|s| s)
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String, ttl: i64 },
    Get { key: String },
    Invalidate { prefix: String },
    Advance { secs: i64 },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy(), -5i64..30)
            .prop_map(|(key, value, ttl)| CacheOp::Set { key, value, ttl }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        "(accounts|analytics|user)?:?[0-9]?".prop_map(|prefix| CacheOp::Invalidate { prefix }),
        (0i64..20).prop_map(|secs| CacheOp::Advance { secs }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_unset_keys_are_absent(key in key_strategy()) {
        let (mut store, _) = store_with_clock();
        prop_assert!(store.get(&key).is_none());
    }

    #[test]
    fn prop_roundtrip_before_expiry(
        key in key_strategy(),
        value in value_strategy(),
        ttl in 1i64..3600,
    ) {
        let (mut store, clock) = store_with_clock();

        store.set(key.clone(), value.clone(), ttl);
        prop_assert_eq!(store.get(&key), Some(value.clone()));

        clock.advance_secs(ttl - 1);
        prop_assert_eq!(store.get(&key), Some(value));
    }

    #[test]
    fn prop_absent_after_ttl(
        key in key_strategy(),
        value in value_strategy(),
        ttl in 1i64..3600,
        extra in 0i64..100,
    ) {
        let (mut store, clock) = store_with_clock();

        store.set(key.clone(), value, ttl);
        clock.advance_secs(ttl + extra);

        // Stale but unobserved: counted, not swept.
        let stats = store.stats();
        prop_assert_eq!(stats.total, 1);
        prop_assert_eq!(stats.expired, 1);
        prop_assert_eq!(stats.active, 0);

        prop_assert!(store.get(&key).is_none());
        prop_assert_eq!(store.stats().total, 0);
    }

    #[test]
    fn prop_non_positive_ttl_never_expires(
        key in key_strategy(),
        value in value_strategy(),
        ttl in -1000i64..=NO_TTL,
        elapsed in 0i64..1_000_000_000,
    ) {
        let (mut store, clock) = store_with_clock();

        store.set(key.clone(), value.clone(), ttl);
        clock.advance_secs(elapsed);

        prop_assert_eq!(store.get(&key), Some(value));
    }

    #[test]
    fn prop_invalidate_prefix_removes_exactly_matches(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..40),
        prefix in "(accounts|analytics|user)?:?[0-9]?",
    ) {
        let (mut store, _) = store_with_clock();
        for (key, value) in &entries {
            store.set(key.clone(), value.clone(), NO_TTL);
        }
        let keys: Vec<String> = entries.iter().map(|(k, _)| k.clone()).collect();

        store.invalidate_prefix(&prefix);

        for key in keys {
            prop_assert_eq!(store.contains_key(&key), !key.starts_with(&prefix));
        }
    }

    #[test]
    fn prop_empty_prefix_equals_clear(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 0..20),
    ) {
        let (mut a, _) = store_with_clock();
        let (mut b, _) = store_with_clock();
        for (key, value) in &entries {
            a.set(key.clone(), value.clone(), 10);
            b.set(key.clone(), value.clone(), 10);
        }

        a.invalidate_prefix("");
        b.clear();

        prop_assert!(a.is_empty());
        prop_assert!(b.is_empty());
    }

    // Replays random operations against a plain model map and checks that
    // every read agrees and stats stay consistent.
    #[test]
    fn prop_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let (mut store, clock) = store_with_clock();
        // key -> (value, absolute expiry in elapsed seconds)
        let mut model: HashMap<String, (String, Option<i64>)> = HashMap::new();
        let mut elapsed = 0i64;
        let (mut sets, mut invalidated) = (0u64, 0u64);

        for op in ops {
            match op {
                CacheOp::Set { key, value, ttl } => {
                    let expiry = (ttl > 0).then_some(elapsed + ttl);
                    model.insert(key.clone(), (value.clone(), expiry));
                    store.set(key, value, ttl);
                    sets += 1;
                }
                CacheOp::Get { key } => {
                    let expected = match model.get(&key) {
                        Some((_, Some(exp))) if elapsed >= *exp => {
                            model.remove(&key);
                            None
                        }
                        Some((value, _)) => Some(value.clone()),
                        None => None,
                    };
                    prop_assert_eq!(store.get(&key), expected);
                }
                CacheOp::Invalidate { prefix } => {
                    let before = model.len();
                    model.retain(|k, _| !k.starts_with(&prefix));
                    invalidated += (before - model.len()) as u64;
                    prop_assert_eq!(store.invalidate_prefix(&prefix), before - model.len());
                }
                CacheOp::Advance { secs } => {
                    elapsed += secs;
                    clock.advance_secs(secs);
                }
            }

            let expired = model
                .values()
                .filter(|(_, exp)| exp.is_some_and(|e| elapsed >= e))
                .count();
            let stats = store.stats();
            prop_assert_eq!(stats.total, model.len());
            prop_assert_eq!(stats.expired, expired);
            prop_assert_eq!(stats.active + stats.expired, stats.total);
            prop_assert_eq!(stats.sets, sets);
            prop_assert_eq!(stats.invalidations, invalidated);
        }
    }
}
