//! Plain HTTP fetcher.
//!
//! Issues a single GET for the issue page and returns the body as served.
//! No JavaScript runs, so content the tracker renders client-side (the
//! comment thread, in particular) may be missing.

use async_trait::async_trait;

use crate::{FetchError, PageFetcher, issue_url};

/// Fetcher that retrieves issue pages with one unauthenticated GET request.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    /// URL prefix the issue identifier is appended to.
    base_url: String,
    /// Shared HTTP client.
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a new `HttpFetcher` for pages under `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            base_url: base_url.to_owned(),
            client,
        })
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, issue_id: &str) -> Result<String, FetchError> {
        let url = issue_url(&self.base_url, issue_id);
        log::debug!("GET {url}");

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let body = response.text().await?;

        log::debug!("Downloaded {} bytes from {url}", body.len());
        Ok(body)
    }

    fn strategy(&self) -> &'static str {
        "http"
    }
}
