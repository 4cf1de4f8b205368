//! Store Module
//!
//! The key-value contract every cache in this crate is built on, plus a Redis
//! backend and an in-process backend with the same semantics.

mod entry;
mod memory;
mod redis_impl;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{CacheError, Result};

pub use entry::{EntryValue, StoreEntry};
pub use memory::MemoryStore;
pub use redis_impl::RedisStore;

// == Key Value Store ==
/// Operations the caches need from a backing key-value store.
///
/// Keys are text, values are opaque bytes. List keys keep insertion order:
/// `rpush` appends to the tail and `lrange` reads front to back.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<()>;

    /// Gets a value by key. Absent or expired keys yield `None`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value with no expiry, replacing any previous value and TTL.
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Sets a value that expires after `ttl`, at millisecond precision.
    ///
    /// A TTL shorter than one millisecond is rejected.
    async fn set_ex(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()>;

    /// Atomically increments an integer key, starting from 0 when absent.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Returns true if the key holds a live value of any kind.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Appends a value to the tail of a list key.
    async fn rpush(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Reads list elements from `start` to `stop` inclusive.
    ///
    /// Negative indices count from the tail, so `(0, -1)` reads the whole list.
    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>>;

    /// Removes every key.
    async fn flush(&self) -> Result<()>;
}

/// Converts `ttl` to whole milliseconds for `set_ex`, rejecting zero.
pub(crate) fn ttl_millis(ttl: Duration) -> Result<u64> {
    match u64::try_from(ttl.as_millis()) {
        Ok(0) => Err(CacheError::Store(
            "invalid expire time in 'psetex' command".to_string(),
        )),
        Ok(millis) => Ok(millis),
        Err(_) => Err(CacheError::Store(format!("TTL {:?} out of range", ttl))),
    }
}
