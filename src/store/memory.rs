//! Memory Store Module
//!
//! In-process key-value store combining HashMap storage with lazy TTL expiration.
//! Mirrors the Redis command semantics the caches rely on, including WRONGTYPE
//! errors and integer-only increments.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{ttl_millis, EntryValue, KeyValueStore, StoreEntry};
use crate::error::{CacheError, Result};

const WRONG_TYPE: &str = "WRONGTYPE Operation against a key holding the wrong kind of value";

// == Memory Store ==
/// Thread-safe in-process store.
///
/// Clones share the same underlying map, so one instance can be handed to
/// several caches the way a Redis connection would be.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, StoreEntry>>>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Length ==
    /// Returns the number of live keys.
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.values().filter(|entry| !entry.is_expired()).count()
    }

    // == Is Empty ==
    /// Returns true if no live key remains.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Returns the live entry for `key`, dropping it first if it has expired.
fn live_entry<'a>(
    entries: &'a mut HashMap<String, StoreEntry>,
    key: &str,
) -> Option<&'a mut StoreEntry> {
    if entries.get(key).is_some_and(StoreEntry::is_expired) {
        entries.remove(key);
        debug!(key, "dropped expired entry");
    }
    entries.get_mut(key)
}

/// Resolves Redis-style inclusive range bounds against a list length.
fn range_bounds(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if start >= len || stop < 0 || start > stop {
        None
    } else {
        Some((start as usize, stop as usize))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key) {
            Some(StoreEntry {
                value: EntryValue::Bytes(bytes),
                ..
            }) => Ok(Some(bytes.clone())),
            Some(_) => Err(CacheError::Store(WRONG_TYPE.to_string())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), StoreEntry::bytes(value));
        Ok(())
    }

    async fn set_ex(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        let ttl = Duration::from_millis(ttl_millis(ttl)?);
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            StoreEntry::new(EntryValue::Bytes(value.to_vec()), Some(ttl)),
        );
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let mut entries = self.entries.write().await;
        let Some(entry) = live_entry(&mut entries, key) else {
            entries.insert(key.to_string(), StoreEntry::bytes(b"1"));
            return Ok(1);
        };

        let EntryValue::Bytes(bytes) = &mut entry.value else {
            return Err(CacheError::Store(WRONG_TYPE.to_string()));
        };

        // Existing TTL is kept, as Redis does
        let next = std::str::from_utf8(bytes)
            .ok()
            .and_then(|text| text.parse::<i64>().ok())
            .and_then(|current| current.checked_add(1))
            .ok_or_else(|| {
                CacheError::Store("value is not an integer or out of range".to_string())
            })?;
        *bytes = next.to_string().into_bytes();
        Ok(next)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.write().await;
        Ok(live_entry(&mut entries, key).is_some())
    }

    async fn rpush(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key) {
            Some(StoreEntry {
                value: EntryValue::List(items),
                ..
            }) => items.push(value.to_vec()),
            Some(_) => return Err(CacheError::Store(WRONG_TYPE.to_string())),
            None => {
                entries.insert(
                    key.to_string(),
                    StoreEntry::new(EntryValue::List(vec![value.to_vec()]), None),
                );
            }
        }
        Ok(())
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key) {
            Some(StoreEntry {
                value: EntryValue::List(items),
                ..
            }) => Ok(range_bounds(items.len(), start, stop)
                .map(|(from, to)| items[from..=to].to_vec())
                .unwrap_or_default()),
            Some(_) => Err(CacheError::Store(WRONG_TYPE.to_string())),
            None => Ok(Vec::new()),
        }
    }

    async fn flush(&self) -> Result<()> {
        let mut entries = self.entries.write().await;
        let removed = entries.len();
        entries.clear();
        debug!(removed, "flushed memory store");
        Ok(())
    }
}
