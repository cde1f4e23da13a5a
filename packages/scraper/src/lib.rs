#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Page retrieval for issue pages.
//!
//! Provides the [`PageFetcher`] trait and its two interchangeable
//! implementations: a plain HTTP GET ([`http`]) and a headless browser
//! that lets client-side content such as comments render before the DOM is
//! captured ([`browser`]).
//!
//! This crate knows nothing about the page structure. It returns raw HTML
//! and leaves extraction to callers.

pub mod browser;
pub mod http;

use async_trait::async_trait;

/// Errors that can occur while fetching an issue page.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// An HTTP request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// An I/O operation failed (writing the debug snapshot, reading
    /// browser output).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The browser process could not be started.
    #[error("Failed to launch browser '{binary}': {source}")]
    Launch {
        /// Browser executable that was invoked.
        binary: String,
        /// Underlying spawn error.
        source: std::io::Error,
    },

    /// The browser process exited unsuccessfully.
    #[error("Browser exited with {status}: {stderr}")]
    BrowserExit {
        /// Exit status reported by the process.
        status: std::process::ExitStatus,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// The fetch completed but produced no markup.
    #[error("Empty page returned for {0}")]
    EmptyPage(String),
}

/// Retrieves the raw HTML of a single issue page.
///
/// Implementations build the page URL from their configured base URL and
/// the issue identifier via [`issue_url`].
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the page for `issue_id` and returns its HTML.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the page cannot be retrieved.
    async fn fetch(&self, issue_id: &str) -> Result<String, FetchError>;

    /// Returns the name of the fetch strategy (`"http"` or `"browser"`).
    fn strategy(&self) -> &str;
}

/// Builds the page URL for an issue by plain concatenation.
///
/// `issue_url("https://issues.apache.org/jira/browse/CAMEL-", "10597")`
/// yields `https://issues.apache.org/jira/browse/CAMEL-10597`.
#[must_use]
pub fn issue_url(base_url: &str, issue_id: &str) -> String {
    format!("{base_url}{issue_id}")
}

/// Fetches an issue page, converting any failure into an empty string.
///
/// The error is logged here, so callers only need to treat `""` as "fetch
/// failed" rather than "empty page".
pub async fn fetch_issue_page(fetcher: &(impl PageFetcher + ?Sized), issue_id: &str) -> String {
    log::debug!(
        "Fetching issue {issue_id} with the {} fetcher",
        fetcher.strategy()
    );

    match fetcher.fetch(issue_id).await {
        Ok(html) => {
            log::info!("Fetched issue {issue_id} ({} bytes)", html.len());
            html
        }
        Err(e) => {
            log::error!("Error fetching issue {issue_id}: {e}");
            String::new()
        }
    }
}
