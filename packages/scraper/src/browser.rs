//! Headless browser fetcher.
//!
//! Launches a Chromium-family browser in headless mode, lets the page run
//! its scripts for a fixed virtual-time budget, and captures the serialized
//! DOM from standard output. One browser process is started per fetch and
//! is killed when its handle is dropped, so it never outlives the call.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::{FetchError, PageFetcher, issue_url};

/// Default browser executable looked up on `PATH`.
pub const DEFAULT_BROWSER: &str = "chromium";

/// Default time given to client-side scripts before the DOM is captured.
pub const DEFAULT_WAIT: Duration = Duration::from_secs(2);

/// Default location of the debug HTML snapshot.
pub const DEFAULT_SNAPSHOT_PATH: &str = "full_page.html";

/// Fetcher that renders issue pages in a headless browser.
#[derive(Debug, Clone)]
pub struct BrowserFetcher {
    /// URL prefix the issue identifier is appended to.
    base_url: String,
    /// Browser executable (name on `PATH` or absolute path).
    binary: PathBuf,
    /// Script run time before the DOM is dumped.
    wait: Duration,
    /// Where to persist the fetched HTML, if anywhere.
    snapshot_path: Option<PathBuf>,
    /// Extra command-line flags passed before the URL.
    extra_args: Vec<String>,
}

impl BrowserFetcher {
    /// Creates a new `BrowserFetcher` for pages under `base_url` with the
    /// default browser, wait, and snapshot path.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_owned(),
            binary: PathBuf::from(DEFAULT_BROWSER),
            wait: DEFAULT_WAIT,
            snapshot_path: Some(PathBuf::from(DEFAULT_SNAPSHOT_PATH)),
            extra_args: Vec::new(),
        }
    }

    /// Overrides the browser executable.
    #[must_use]
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Overrides how long page scripts may run before the DOM is captured.
    #[must_use]
    pub const fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    /// Sets (or with `None`, disables) the debug snapshot path.
    #[must_use]
    pub fn with_snapshot_path(mut self, path: Option<PathBuf>) -> Self {
        self.snapshot_path = path;
        self
    }

    /// Appends an extra command-line flag (e.g. `--no-sandbox`).
    #[must_use]
    pub fn with_arg(mut self, arg: &str) -> Self {
        self.extra_args.push(arg.to_owned());
        self
    }

    /// Returns the configured debug snapshot path.
    #[must_use]
    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    /// Builds the browser invocation for `url`.
    fn command(&self, url: &str) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg("--headless")
            .arg("--disable-gpu")
            .arg(format!("--virtual-time-budget={}", self.wait.as_millis()))
            .arg("--dump-dom")
            .args(&self.extra_args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    async fn fetch(&self, issue_id: &str) -> Result<String, FetchError> {
        let url = issue_url(&self.base_url, issue_id);
        log::debug!(
            "Rendering {url} with {} (wait {}ms)",
            self.binary.display(),
            self.wait.as_millis()
        );

        let child = self
            .command(&url)
            .spawn()
            .map_err(|source| FetchError::Launch {
                binary: self.binary.display().to_string(),
                source,
            })?;
        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(FetchError::BrowserExit {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        let html = String::from_utf8_lossy(&output.stdout).into_owned();
        if html.trim().is_empty() {
            return Err(FetchError::EmptyPage(url));
        }

        if let Some(path) = &self.snapshot_path {
            tokio::fs::write(path, &html).await?;
            log::debug!("Saved page snapshot to {}", path.display());
        }

        Ok(html)
    }

    fn strategy(&self) -> &'static str {
        "browser"
    }
}
