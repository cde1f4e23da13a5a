#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Single-issue crawl pipeline.
//!
//! [`run`] performs the whole job for one issue in sequence: fetch the page,
//! parse its sections into a record, and write the record's CSV row. A
//! failed fetch is not an error here: it is logged, reported as
//! [`CrawlOutcome::FetchFailed`], and leaves the output file untouched.

pub mod config;

use std::path::PathBuf;

use issue_crawler_export::{ExportError, write_to_csv};
use issue_crawler_parser::{ParseError, parse_issue};
use issue_crawler_scraper::{FetchError, PageFetcher, fetch_issue_page};

pub use config::{CrawlConfig, FetchStrategy, Overrides, StrategyKind};

/// Errors that abort a crawl.
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    /// Loading configuration failed.
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    /// The fetcher could not be constructed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The page was fetched but its markup is malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Writing the CSV failed.
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// What a completed crawl did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// The row was written.
    Written {
        /// CSV file that was written.
        path: PathBuf,
        /// Number of comments encoded into the row.
        comments: usize,
    },
    /// The page could not be fetched; nothing was written.
    FetchFailed,
}

/// Fetches, parses, and exports the configured issue.
///
/// # Errors
///
/// Returns [`CrawlError::Parse`] if the page is malformed and
/// [`CrawlError::Export`] if the CSV cannot be written. Fetch failures are
/// reported as [`CrawlOutcome::FetchFailed`] instead.
pub async fn run(
    config: &CrawlConfig,
    fetcher: &(impl PageFetcher + ?Sized),
) -> Result<CrawlOutcome, CrawlError> {
    log::info!(
        "Crawling {} with the {} fetcher",
        config.issue_url(),
        fetcher.strategy()
    );

    let html = fetch_issue_page(fetcher, &config.issue_id).await;
    if html.is_empty() {
        log::warn!(
            "No page content for issue {}; skipping CSV output",
            config.issue_id
        );
        return Ok(CrawlOutcome::FetchFailed);
    }

    let parsed = parse_issue(&html)?;
    write_to_csv(&parsed.record, &config.output_path)?;

    log::info!("Wrote issue {} to {}", config.issue_id, config.output_path.display());

    Ok(CrawlOutcome::Written {
        path: config.output_path.clone(),
        comments: parsed.comments.len(),
    })
}
