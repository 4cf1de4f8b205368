//! Call Counting
//!
//! Wrapper that bumps a per-operation counter in the backing store on every call.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::Operation;
use crate::error::{CacheError, Result};
use crate::store::KeyValueStore;

// == Counted ==
/// Operation wrapper that increments the counter keyed by the inner
/// operation's qualified name before running it.
///
/// The increment is atomic in the store, so concurrent callers never lose
/// updates. A call that fails after the increment still counts.
pub struct Counted<O> {
    inner: O,
    store: Arc<dyn KeyValueStore>,
}

impl<O: Operation> Counted<O> {
    pub fn new(inner: O, store: Arc<dyn KeyValueStore>) -> Self {
        Self { inner, store }
    }

    /// Returns the wrapped operation.
    pub fn inner(&self) -> &O {
        &self.inner
    }
}

#[async_trait]
impl<O: Operation> Operation for Counted<O> {
    type Input = O::Input;
    type Output = O::Output;

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn invoke(&self, input: Self::Input) -> Result<Self::Output> {
        let calls = self.store.incr(self.name()).await?;
        debug!(operation = self.name(), calls, "counted call");
        self.inner.invoke(input).await
    }
}

// == Call Count ==
/// Reads the call counter for `name`, returning 0 if it was never called.
pub async fn call_count(store: &dyn KeyValueStore, name: &str) -> Result<i64> {
    match store.get(name).await? {
        Some(raw) => std::str::from_utf8(&raw)
            .ok()
            .and_then(|text| text.parse().ok())
            .ok_or_else(|| {
                CacheError::ValueConversion(format!("counter '{}' is not an integer", name))
            }),
        None => Ok(0),
    }
}
