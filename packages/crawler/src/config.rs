//! Crawl configuration.
//!
//! A [`CrawlConfig`] names the issue to fetch, where to fetch it from, how
//! (plain HTTP or headless browser), and where to write the CSV. It is
//! loaded from TOML; the built-in defaults live in `config/default.toml`
//! and are embedded at compile time. Command-line flags are layered on top
//! via [`Overrides`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use issue_crawler_export::DEFAULT_OUTPUT_PATH;
use issue_crawler_scraper::browser::{
    BrowserFetcher, DEFAULT_BROWSER, DEFAULT_SNAPSHOT_PATH, DEFAULT_WAIT,
};
use issue_crawler_scraper::http::HttpFetcher;
use issue_crawler_scraper::{FetchError, PageFetcher, issue_url};
use serde::Deserialize;

/// Issue fetched when none is configured (`CAMEL-10597`).
pub const DEFAULT_ISSUE_ID: &str = "10597";

/// URL prefix issue identifiers are appended to.
pub const DEFAULT_BASE_URL: &str = "https://issues.apache.org/jira/browse/CAMEL-";

/// Embedded built-in configuration.
const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration is not valid TOML or has unexpected keys.
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Everything a single crawl needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrawlConfig {
    /// Issue identifier appended to [`Self::base_url`].
    #[serde(default = "default_issue_id")]
    pub issue_id: String,
    /// URL prefix for issue pages.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// CSV file to write (replaced on every run).
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    /// How the page is retrieved.
    #[serde(default)]
    pub fetch: FetchStrategy,
}

/// Page retrieval strategy, tagged by `type` in TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FetchStrategy {
    /// A single plain HTTP GET. Fast, but client-rendered content such as
    /// comments may be absent.
    Http,
    /// A headless Chromium-family browser.
    Browser {
        /// Browser executable (name on `PATH` or absolute path).
        #[serde(default = "default_browser")]
        binary: PathBuf,
        /// Milliseconds page scripts may run before the DOM is captured.
        #[serde(default = "default_wait_ms")]
        wait_ms: u64,
        /// Whether to save the fetched HTML to `snapshot_path`.
        #[serde(default = "default_true")]
        save_snapshot: bool,
        /// Debug snapshot location.
        #[serde(default = "default_snapshot_path")]
        snapshot_path: PathBuf,
        /// Extra browser flags (e.g. `["--no-sandbox"]`).
        #[serde(default)]
        args: Vec<String>,
    },
}

fn default_issue_id() -> String {
    DEFAULT_ISSUE_ID.to_owned()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

fn default_browser() -> PathBuf {
    PathBuf::from(DEFAULT_BROWSER)
}

#[allow(clippy::cast_possible_truncation)]
const fn default_wait_ms() -> u64 {
    DEFAULT_WAIT.as_millis() as u64
}

const fn default_true() -> bool {
    true
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from(DEFAULT_SNAPSHOT_PATH)
}

impl Default for FetchStrategy {
    fn default() -> Self {
        Self::browser()
    }
}

impl FetchStrategy {
    /// The browser strategy with every setting at its default.
    #[must_use]
    pub fn browser() -> Self {
        Self::Browser {
            binary: default_browser(),
            wait_ms: default_wait_ms(),
            save_snapshot: true,
            snapshot_path: default_snapshot_path(),
            args: Vec::new(),
        }
    }

    /// Builds the fetcher for this strategy.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the HTTP client cannot be built.
    pub fn build(&self, base_url: &str) -> Result<Box<dyn PageFetcher>, FetchError> {
        Ok(match self {
            Self::Http => Box::new(HttpFetcher::new(base_url)?),
            Self::Browser {
                binary,
                wait_ms,
                save_snapshot,
                snapshot_path,
                args,
            } => {
                let fetcher = BrowserFetcher::new(base_url)
                    .with_binary(binary.clone())
                    .with_wait(Duration::from_millis(*wait_ms))
                    .with_snapshot_path(save_snapshot.then(|| snapshot_path.clone()));
                Box::new(
                    args.iter()
                        .fold(fetcher, |fetcher, arg| fetcher.with_arg(arg)),
                )
            }
        })
    }
}

/// Strategy selector used by [`Overrides`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// [`FetchStrategy::Http`].
    Http,
    /// [`FetchStrategy::Browser`].
    Browser,
}

/// Per-field overrides applied on top of a loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Replaces [`CrawlConfig::issue_id`].
    pub issue_id: Option<String>,
    /// Replaces [`CrawlConfig::base_url`].
    pub base_url: Option<String>,
    /// Replaces [`CrawlConfig::output_path`].
    pub output_path: Option<PathBuf>,
    /// Switches strategy; switching to the browser starts from defaults.
    pub strategy: Option<StrategyKind>,
    /// Browser executable (browser strategy only).
    pub browser: Option<PathBuf>,
    /// Render wait in milliseconds (browser strategy only).
    pub wait_ms: Option<u64>,
    /// Disables the debug snapshot (browser strategy only).
    pub no_snapshot: bool,
}

impl CrawlConfig {
    /// Returns the built-in configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded `config/default.toml` fails to parse. Since
    /// it is a compile-time constant, a failure is a development error and
    /// is caught by the tests.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_toml_str(DEFAULT_CONFIG_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse built-in config: {e}"))
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the text is invalid.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(text)?)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Full URL of the configured issue page.
    #[must_use]
    pub fn issue_url(&self) -> String {
        issue_url(&self.base_url, &self.issue_id)
    }

    /// Applies command-line overrides in place.
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(issue_id) = overrides.issue_id {
            self.issue_id = issue_id;
        }
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(output_path) = overrides.output_path {
            self.output_path = output_path;
        }

        match overrides.strategy {
            Some(StrategyKind::Http) => self.fetch = FetchStrategy::Http,
            Some(StrategyKind::Browser) if self.fetch == FetchStrategy::Http => {
                self.fetch = FetchStrategy::browser();
            }
            _ => {}
        }

        match &mut self.fetch {
            FetchStrategy::Browser {
                binary,
                wait_ms,
                save_snapshot,
                ..
            } => {
                if let Some(browser) = overrides.browser {
                    *binary = browser;
                }
                if let Some(wait) = overrides.wait_ms {
                    *wait_ms = wait;
                }
                if overrides.no_snapshot {
                    *save_snapshot = false;
                }
            }
            FetchStrategy::Http => {
                if overrides.browser.is_some()
                    || overrides.wait_ms.is_some()
                    || overrides.no_snapshot
                {
                    log::warn!("Browser options are ignored with the http fetch strategy");
                }
            }
        }
    }
}
