//! Page Module
//!
//! Fetches remote pages through a TTL cache kept in the backing store.

mod cache;
mod fetcher;

pub use cache::{cached_key, count_key, PageCache, DEFAULT_PAGE_TTL};
pub use fetcher::{HttpFetcher, PageFetcher};
