//! Page Cache Module
//!
//! Caches fetched page bodies in the backing store for a fixed TTL and keeps
//! a per-URL access counter.
//!
//! # Races
//!
//! Lookup, fetch and write are separate steps. Two callers missing on the
//! same URL at once will both fetch, and the last write wins. Bodies for one
//! URL are assumed interchangeable within the TTL.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::PageFetcher;
use crate::cache::{decode_int, decode_str};
use crate::error::Result;
use crate::store::KeyValueStore;

/// Default lifetime of a cached page body.
pub const DEFAULT_PAGE_TTL: Duration = Duration::from_secs(10);

/// Key of the access counter for `url`.
pub fn count_key(url: &str) -> String {
    format!("count:{}", url)
}

/// Key of the cached body for `url`.
pub fn cached_key(url: &str) -> String {
    format!("cached:{}", url)
}

// == Page Cache ==
/// TTL cache in front of a `PageFetcher`.
pub struct PageCache {
    store: Arc<dyn KeyValueStore>,
    fetcher: Arc<dyn PageFetcher>,
    ttl: Duration,
}

impl PageCache {
    // == Constructor ==
    /// Creates a page cache with the default 10 second TTL.
    pub fn new(store: Arc<dyn KeyValueStore>, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self::with_ttl(store, fetcher, DEFAULT_PAGE_TTL)
    }

    /// Creates a page cache with a custom TTL.
    pub fn with_ttl(
        store: Arc<dyn KeyValueStore>,
        fetcher: Arc<dyn PageFetcher>,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            fetcher,
            ttl,
        }
    }

    // == Get Page ==
    /// Returns the body of `url`, from cache while it is fresh.
    ///
    /// The access counter is bumped before anything else, so failed fetches
    /// are counted too. Failures are never cached.
    pub async fn get_page(&self, url: &str) -> Result<String> {
        let accesses = self.store.incr(&count_key(url)).await?;

        let key = cached_key(url);
        if let Some(raw) = self.store.get(&key).await? {
            info!(url, accesses, "Page cache hit");
            return decode_str(raw);
        }

        info!(url, accesses, "Page cache miss, fetching");
        let body = match self.fetcher.fetch(url).await {
            Ok(body) => body,
            Err(err) => {
                warn!(url, error = %err, "Page fetch failed");
                return Err(err);
            }
        };

        self.store.set_ex(&key, body.as_bytes(), self.ttl).await?;
        Ok(body)
    }

    // == Access Count ==
    /// Number of `get_page` calls seen for `url`, 0 if never requested.
    pub async fn access_count(&self, url: &str) -> Result<i64> {
        match self.store.get(&count_key(url)).await? {
            Some(raw) => decode_int(raw),
            None => Ok(0),
        }
    }

    /// Configured lifetime of cached bodies.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
