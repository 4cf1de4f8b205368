//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the round-trip, counting and history properties of
//! the object cache over an in-process store.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

use crate::cache::{Cache, StoredValue, STORE_OPERATION};
use crate::instrument::{call_count, history, Counted, Instrument, Operation, Recorded, Repr};
use crate::store::{KeyValueStore, MemoryStore};

// == Helpers ==
fn create_test_cache() -> Cache {
    tokio_test::block_on(Cache::new(Arc::new(MemoryStore::new()))).unwrap()
}

// == Strategies ==
fn text_strategy() -> impl Strategy<Value = String> {
    ".{0,64}".prop_map(|s| s)
}

fn bytes_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..64)
}

fn float_strategy() -> impl Strategy<Value = f64> {
    prop::num::f64::NORMAL | prop::num::f64::ZERO | prop::num::f64::SUBNORMAL
}

/// Which of two independently instrumented operations to call next
#[derive(Debug, Clone, Copy)]
enum Target {
    Left,
    Right,
}

fn target_strategy() -> impl Strategy<Value = Target> {
    prop_oneof![Just(Target::Left), Just(Target::Right)]
}

struct Named {
    name: &'static str,
}

#[async_trait::async_trait]
impl Operation for Named {
    type Input = (i64,);
    type Output = i64;

    fn name(&self) -> &str {
        self.name
    }

    async fn invoke(&self, input: (i64,)) -> crate::error::Result<i64> {
        Ok(input.0 * 2)
    }
}

fn instrumented(name: &'static str, store: &Arc<dyn KeyValueStore>) -> Counted<Recorded<Named>> {
    Named { name }.recorded(store.clone()).counted(store.clone())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Storing any text and reading it back as text returns the same text.
    #[test]
    fn prop_text_roundtrip(value in text_strategy()) {
        let cache = create_test_cache();
        let key = tokio_test::block_on(cache.store(value.as_str())).unwrap();
        let read = tokio_test::block_on(cache.get_str(&key)).unwrap();
        prop_assert_eq!(read, Some(value));
    }

    // Raw bytes are stored verbatim.
    #[test]
    fn prop_bytes_roundtrip(value in bytes_strategy()) {
        let cache = create_test_cache();
        let key = tokio_test::block_on(cache.store(value.clone())).unwrap();
        let read = tokio_test::block_on(cache.get(&key)).unwrap();
        prop_assert_eq!(read, Some(value));
    }

    // Integers survive the decimal text encoding.
    #[test]
    fn prop_integer_roundtrip(value in any::<i64>()) {
        let cache = create_test_cache();
        let key = tokio_test::block_on(cache.store(value)).unwrap();
        let read = tokio_test::block_on(cache.get_int(&key)).unwrap();
        prop_assert_eq!(read, Some(value));
    }

    // Floats survive the decimal text encoding exactly.
    #[test]
    fn prop_float_roundtrip(value in float_strategy()) {
        let cache = create_test_cache();
        let key = tokio_test::block_on(cache.store(value)).unwrap();
        let read = tokio_test::block_on(cache.get_float(&key)).unwrap();
        prop_assert_eq!(read, Some(value));
    }

    // After N sequential stores the counter is N and history is index-aligned.
    #[test]
    fn prop_history_aligned(values in prop::collection::vec(text_strategy(), 0..30)) {
        let cache = create_test_cache();
        let mut keys = Vec::new();
        for value in &values {
            keys.push(tokio_test::block_on(cache.store(value.as_str())).unwrap());
        }

        let store = cache.store_handle().clone();
        let snapshot = tokio_test::block_on(history(store.as_ref(), STORE_OPERATION)).unwrap();

        prop_assert_eq!(snapshot.calls, values.len() as i64);
        prop_assert_eq!(snapshot.records.len(), values.len());
        for ((record, value), key) in snapshot.records.iter().zip(&values).zip(&keys) {
            let expected_input = format!("({},)", StoredValue::from(value.as_str()).repr());
            prop_assert_eq!(&record.input, &expected_input);
            prop_assert_eq!(&record.output, key);
        }
    }

    // Counters of different operations never bleed into each other.
    #[test]
    fn prop_counters_independent(targets in prop::collection::vec(target_strategy(), 0..50)) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let left = instrumented("Left.call", &store);
        let right = instrumented("Right.call", &store);

        let mut expected = (0i64, 0i64);
        for (i, target) in targets.iter().enumerate() {
            match target {
                Target::Left => {
                    tokio_test::block_on(left.invoke((i as i64,))).unwrap();
                    expected.0 += 1;
                }
                Target::Right => {
                    tokio_test::block_on(right.invoke((i as i64,))).unwrap();
                    expected.1 += 1;
                }
            }
        }

        let left_count = tokio_test::block_on(call_count(store.as_ref(), "Left.call")).unwrap();
        let right_count = tokio_test::block_on(call_count(store.as_ref(), "Right.call")).unwrap();
        prop_assert_eq!(left_count, expected.0);
        prop_assert_eq!(right_count, expected.1);
    }
}

// Identifier uniqueness is checked once over a large batch rather than per case
#[test]
fn test_identifiers_pairwise_distinct() {
    let cache = create_test_cache();
    let mut seen = HashSet::new();

    tokio_test::block_on(async {
        for i in 0..10_000i64 {
            let key = cache.store(i).await.unwrap();
            assert!(seen.insert(key), "identifier reused after {} stores", i);
        }
    });

    assert_eq!(seen.len(), 10_000);
    assert_eq!(tokio_test::block_on(cache.call_count()).unwrap(), 10_000);
}
