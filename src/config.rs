//! Configuration Module
//!
//! Handles loading settings for the store connection and page cache from
//! environment variables.

use std::env;
use std::time::Duration;

/// Runtime configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Connection URL for the backing Redis server
    pub redis_url: String,
    /// Lifetime of a cached page body in seconds
    pub page_ttl: u64,
    /// Whether the store is flushed when the object cache is created
    pub flush_on_start: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_URL` - Backing store URL (default: redis://127.0.0.1:6379)
    /// - `PAGE_TTL` - Page cache TTL in seconds (default: 10)
    /// - `FLUSH_ON_START` - Flush the store before use (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            page_ttl: env::var("PAGE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.page_ttl),
            flush_on_start: env::var("FLUSH_ON_START")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.flush_on_start),
        }
    }

    /// Page cache TTL as a Duration.
    pub fn page_ttl(&self) -> Duration {
        Duration::from_secs(self.page_ttl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            page_ttl: 10,
            flush_on_start: true,
        }
    }
}
