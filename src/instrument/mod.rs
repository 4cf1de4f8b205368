//! Instrumentation Module
//!
//! Explicit, composable wrappers that add call counting and call history
//! recording to any [`Operation`].
//!
//! Layering is chosen by the caller:
//!
//! ```ignore
//! let op = StoreOperation::new(store.clone())
//!     .recorded(store.clone())
//!     .counted(store.clone());
//! ```
//!
//! Here counting is the outer layer, so the counter moves exactly once per
//! call and history is written for every counted call.

mod count;
mod history;
mod repr;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::store::KeyValueStore;

pub use count::{call_count, Counted};
pub use history::{
    history, inputs_key, outputs_key, replay, replay_to, CallHistory, CallRecord, Recorded,
};
pub use repr::{CallArgs, Repr};

// == Operation ==
/// A named asynchronous operation that can be instrumented.
#[async_trait]
pub trait Operation: Send + Sync {
    type Input: Send + 'static;
    type Output: Send;

    /// Stable qualified name, used as the key prefix for counters and history.
    fn name(&self) -> &str;

    /// Runs the operation.
    async fn invoke(&self, input: Self::Input) -> Result<Self::Output>;
}

// == Instrument ==
/// Builder methods for wrapping an operation.
pub trait Instrument: Operation + Sized {
    /// Wraps `self` so every call increments its counter in `store`.
    fn counted(self, store: Arc<dyn KeyValueStore>) -> Counted<Self> {
        Counted::new(self, store)
    }

    /// Wraps `self` so every call appends to its history in `store`.
    fn recorded(self, store: Arc<dyn KeyValueStore>) -> Recorded<Self> {
        Recorded::new(self, store)
    }
}

impl<O: Operation> Instrument for O {}
