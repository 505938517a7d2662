//! Single-shot page fetcher that keeps the last fetched text.
//!
//! Unlike [`crate::executor::RetryingRequestExecutor`], a failed fetch is not
//! retried and the reqwest error is returned as is.

use log::debug;
use reqwest::blocking::Client;
use std::time::Duration;

/// Timeout applied to every fetch.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches one URL and holds the body of the last successful fetch.
pub struct PageFetcher {
    client: Client,
    url: String,
    content: String,
}

impl PageFetcher {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), url)
    }

    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            content: String::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Performs one GET and stores the body text.
    ///
    /// Error statuses fail like transport errors. On failure the previously
    /// stored content is kept.
    #[tracing::instrument(skip(self), fields(url = %self.url))]
    pub fn fetch(&mut self) -> Result<&str, reqwest::Error> {
        debug!("Fetching {}...", self.url);

        let response = self
            .client
            .get(&self.url)
            .timeout(FETCH_TIMEOUT)
            .send()?
            .error_for_status()?;
        let text = response.text()?;

        debug!("Fetched {} bytes from {}", text.len(), self.url);
        self.content = text;
        Ok(&self.content)
    }

    /// Body of the last successful fetch, or "" if none succeeded yet.
    pub fn content(&self) -> &str {
        &self.content
    }
}
