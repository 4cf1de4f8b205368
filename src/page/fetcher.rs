//! Page Fetcher
//!
//! Network collaborator for the page cache.

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;

/// Fetches the body of a remote resource.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the response body as text, or a transport error.
    async fn fetch(&self, url: &str) -> Result<String>;
}

// == HTTP Fetcher ==
/// `PageFetcher` backed by a reqwest client.
///
/// Error statuses are not failures here: whatever body the server returned
/// is handed back. Only transport problems become errors.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a preconfigured client, e.g. one with a timeout.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        debug!(url, status = %response.status(), "fetched page");
        Ok(response.text().await?)
    }
}
