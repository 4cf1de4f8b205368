//! Object Cache Module
//!
//! Stores scalar values under freshly minted identifiers and reads them back
//! with optional coercion. Every `store` call is counted and recorded.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::cache::value::{decode_float, decode_int, decode_str};
use crate::cache::StoredValue;
use crate::error::Result;
use crate::instrument::{call_count, Counted, Instrument, Operation, Recorded};
use crate::store::KeyValueStore;

/// Qualified name of the instrumented store operation.
pub const STORE_OPERATION: &str = "Cache.store";

// == Store Operation ==
/// Writes a value under a new random identifier.
pub struct StoreOperation {
    store: Arc<dyn KeyValueStore>,
}

impl StoreOperation {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Operation for StoreOperation {
    type Input = (StoredValue,);
    type Output = String;

    fn name(&self) -> &str {
        STORE_OPERATION
    }

    async fn invoke(&self, input: (StoredValue,)) -> Result<String> {
        let (data,) = input;
        let key = Uuid::new_v4().to_string();
        self.store.set(&key, &data.to_bytes()).await?;
        debug!(key = %key, "stored value");
        Ok(key)
    }
}

// == Cache ==
/// Object cache over a shared store handle.
///
/// The store operation is layered as counting outside history, so the
/// counter moves once per call and every counted call is recorded.
pub struct Cache {
    store: Arc<dyn KeyValueStore>,
    store_op: Counted<Recorded<StoreOperation>>,
}

impl Cache {
    // == Constructor ==
    /// Creates a cache on `store`, failing fast if the store is unreachable.
    ///
    /// Existing keys are left untouched.
    pub async fn new(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        store.ping().await?;
        let store_op = StoreOperation::new(store.clone())
            .recorded(store.clone())
            .counted(store.clone());
        Ok(Self { store, store_op })
    }

    /// Creates a cache on `store` after clearing every key in it.
    pub async fn flushed(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let cache = Self::new(store).await?;
        cache.store.flush().await?;
        info!("Store flushed for new cache");
        Ok(cache)
    }

    // == Store ==
    /// Writes `data` under a fresh UUIDv4 and returns the identifier.
    pub async fn store(&self, data: impl Into<StoredValue>) -> Result<String> {
        self.store_op.invoke((data.into(),)).await
    }

    // == Get ==
    /// Reads the raw bytes stored under `key`, or `None` if absent.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.store.get(key).await
    }

    /// Reads `key` and applies `transform` if a value was found.
    ///
    /// The transform is trusted to match the stored value's original type.
    pub async fn get_with<T, F>(&self, key: &str, transform: F) -> Result<Option<T>>
    where
        F: FnOnce(Vec<u8>) -> Result<T>,
    {
        self.get(key).await?.map(transform).transpose()
    }

    /// Reads `key` as UTF-8 text.
    pub async fn get_str(&self, key: &str) -> Result<Option<String>> {
        self.get_with(key, decode_str).await
    }

    /// Reads `key` as a base-10 integer.
    pub async fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_with(key, decode_int).await
    }

    /// Reads `key` as a floating-point number.
    pub async fn get_float(&self, key: &str) -> Result<Option<f64>> {
        self.get_with(key, decode_float).await
    }

    // == Introspection ==
    /// Number of `store` calls recorded in the backing store.
    pub async fn call_count(&self) -> Result<i64> {
        call_count(self.store.as_ref(), self.store_op.name()).await
    }

    /// Qualified name of the store operation, for use with `replay`.
    pub fn store_operation_name(&self) -> &str {
        self.store_op.name()
    }

    /// Shared handle to the backing store.
    pub fn store_handle(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use crate::instrument::{history, inputs_key, outputs_key, replay_to};
    use crate::store::MemoryStore;

    async fn create_test_cache() -> Cache {
        Cache::new(Arc::new(MemoryStore::new())).await.unwrap()
    }

    #[tokio::test]
    async fn test_store_and_get_str() {
        let cache = create_test_cache().await;

        let key = cache.store("foo").await.unwrap();
        assert_eq!(cache.get_str(&key).await.unwrap(), Some("foo".to_string()));
    }

    #[tokio::test]
    async fn test_store_and_get_int() {
        let cache = create_test_cache().await;

        let key = cache.store(1234).await.unwrap();
        assert_eq!(cache.get_int(&key).await.unwrap(), Some(1234));
    }

    #[tokio::test]
    async fn test_store_and_get_bytes() {
        let cache = create_test_cache().await;

        let key = cache.store(b"bar".to_vec()).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(b"bar".to_vec()));
    }

    #[tokio::test]
    async fn test_store_and_get_float() {
        let cache = create_test_cache().await;

        let key = cache.store(2.5).await.unwrap();
        assert_eq!(cache.get_float(&key).await.unwrap(), Some(2.5));
    }

    #[tokio::test]
    async fn test_identifier_is_uuid_v4() {
        let cache = create_test_cache().await;

        let key = cache.store("x").await.unwrap();
        let parsed = Uuid::parse_str(&key).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[tokio::test]
    async fn test_get_missing_skips_transform() {
        let cache = create_test_cache().await;

        let result = cache
            .get_with("missing", |_| -> Result<()> { panic!("transform must not run") })
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(cache.get_int("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_int_on_text_fails() {
        let cache = create_test_cache().await;

        let key = cache.store("not a number").await.unwrap();
        let result = cache.get_int(&key).await;
        assert!(matches!(result, Err(CacheError::ValueConversion(_))));
    }

    #[tokio::test]
    async fn test_get_str_on_invalid_utf8_fails() {
        let cache = create_test_cache().await;

        let key = cache.store(vec![0xffu8, 0x00]).await.unwrap();
        let result = cache.get_str(&key).await;
        assert!(matches!(result, Err(CacheError::ValueConversion(_))));
    }

    #[tokio::test]
    async fn test_store_counts_and_records() {
        let cache = create_test_cache().await;
        let store = cache.store_handle().clone();

        let keys = vec![
            cache.store("a").await.unwrap(),
            cache.store("b").await.unwrap(),
            cache.store("c").await.unwrap(),
        ];

        assert_eq!(cache.call_count().await.unwrap(), 3);

        let inputs = store.lrange(&inputs_key(STORE_OPERATION), 0, -1).await.unwrap();
        let outputs = store.lrange(&outputs_key(STORE_OPERATION), 0, -1).await.unwrap();
        assert_eq!(inputs.len(), 3);
        for (input, expected) in inputs.iter().zip(["\"a\"", "\"b\"", "\"c\""]) {
            assert!(String::from_utf8_lossy(input).contains(expected));
        }
        let outputs: Vec<String> = outputs
            .into_iter()
            .map(|raw| String::from_utf8(raw).unwrap())
            .collect();
        assert_eq!(outputs, keys);
    }

    #[tokio::test]
    async fn test_replay_store_operation() {
        let cache = create_test_cache().await;
        let key = cache.store("foo").await.unwrap();

        let mut out = Vec::new();
        replay_to(cache.store_handle().as_ref(), cache.store_operation_name(), &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            format!(
                "Cache.store was called 1 times:\nCache.store(*(\"foo\",)) -> {}\n",
                key
            )
        );
    }

    #[tokio::test]
    async fn test_new_keeps_existing_data() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set("existing", b"1").await.unwrap();

        let _cache = Cache::new(store.clone()).await.unwrap();
        assert!(store.exists("existing").await.unwrap());
    }

    #[tokio::test]
    async fn test_flushed_clears_store() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let first = Cache::new(store.clone()).await.unwrap();
        first.store("old").await.unwrap();

        let cache = Cache::flushed(store.clone()).await.unwrap();
        assert_eq!(cache.call_count().await.unwrap(), 0);

        let history = history(store.as_ref(), STORE_OPERATION).await.unwrap();
        assert!(history.records.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_stores_are_all_counted() {
        let cache = Arc::new(create_test_cache().await);

        let handles: Vec<_> = (0..200i64)
            .map(|i| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.store(i).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(cache.call_count().await.unwrap(), 200);

        let store = cache.store_handle().clone();
        let inputs = store.lrange(&inputs_key(STORE_OPERATION), 0, -1).await.unwrap();
        let outputs = store.lrange(&outputs_key(STORE_OPERATION), 0, -1).await.unwrap();
        assert_eq!(inputs.len(), 200);
        assert_eq!(outputs.len(), 200);
    }
}
