//! Redis Exercises - call counting, history replay and page caching
//!
//! Instruments operations with counters and call history kept in a key-value
//! store, and caches fetched web pages for a fixed TTL.

pub mod cache;
pub mod config;
pub mod error;
pub mod instrument;
pub mod page;
pub mod store;

pub use cache::{Cache, StoredValue};
pub use config::Config;
pub use error::{CacheError, Result};
pub use instrument::{replay, replay_to};
pub use page::{HttpFetcher, PageCache};
pub use store::{KeyValueStore, MemoryStore, RedisStore};
