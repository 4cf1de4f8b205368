//! Redis Exercises demo driver
//!
//! Stores a few values through the instrumented cache, replays the recorded
//! calls and optionally fetches a page twice through the TTL page cache.
//!
//! # Usage
//! ```text
//! redis_exercises [URL]
//! ```

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use redis_exercises::instrument::history;
use redis_exercises::{replay, Cache, Config, HttpFetcher, KeyValueStore, PageCache, RedisStore};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect to the backing Redis server
/// 4. Exercise the object cache and replay its history
/// 5. Fetch the URL argument through the page cache, if given
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "redis_exercises=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: redis_url={}, page_ttl={}s, flush_on_start={}",
        config.redis_url, config.page_ttl, config.flush_on_start
    );

    let store: Arc<dyn KeyValueStore> = Arc::new(
        RedisStore::connect(&config.redis_url)
            .await
            .with_context(|| format!("connecting to {}", config.redis_url))?,
    );

    let cache = if config.flush_on_start {
        Cache::flushed(store.clone()).await?
    } else {
        Cache::new(store.clone()).await?
    };

    let text_key = cache.store("foo").await?;
    let int_key = cache.store(1234).await?;
    cache.store(b"bar".to_vec()).await?;
    cache.store(3.5).await?;

    info!(
        "Read back: {:?}, {:?}",
        cache.get_str(&text_key).await?,
        cache.get_int(&int_key).await?
    );

    replay(store.as_ref(), cache.store_operation_name()).await?;

    let snapshot = history(store.as_ref(), cache.store_operation_name()).await?;
    info!("History snapshot: {}", serde_json::to_string(&snapshot)?);

    if let Some(url) = std::env::args().nth(1) {
        let pages = PageCache::with_ttl(
            store.clone(),
            Arc::new(HttpFetcher::new()),
            config.page_ttl(),
        );
        let body = pages.get_page(&url).await?;
        pages.get_page(&url).await?;
        info!(
            "Fetched {} ({} bytes), accessed {} times",
            url,
            body.len(),
            pages.access_count(&url).await?
        );
    }

    Ok(())
}
