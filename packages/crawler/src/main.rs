#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the issue crawler.
//!
//! ```text
//! issue_crawler                                  # CAMEL-10597 via headless browser
//! issue_crawler --issue 11000 --strategy http    # plain HTTP fetch
//! issue_crawler --config crawl.toml --output out.csv
//! ```
//!
//! Uses `indicatif-log-bridge` (via [`issue_crawler_cli_utils::init_logger`])
//! so log lines and the fetch spinner never fight for the terminal.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use issue_crawler::{CrawlConfig, CrawlOutcome, Overrides, StrategyKind, run};

#[derive(Parser)]
#[command(
    name = "issue_crawler",
    about = "Extract one Jira issue page into a single-row CSV file"
)]
struct Cli {
    /// TOML configuration file (defaults to the built-in configuration)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Issue identifier appended to the base URL (e.g., "10597")
    #[arg(long)]
    issue: Option<String>,
    /// URL prefix for issue pages
    #[arg(long)]
    base_url: Option<String>,
    /// CSV file to write
    #[arg(long)]
    output: Option<PathBuf>,
    /// How to fetch the page
    #[arg(long, value_enum)]
    strategy: Option<Strategy>,
    /// Browser executable for the browser strategy
    #[arg(long)]
    browser: Option<PathBuf>,
    /// Milliseconds page scripts may run before the DOM is captured
    #[arg(long)]
    wait_ms: Option<u64>,
    /// Don't save the fetched HTML snapshot
    #[arg(long)]
    no_snapshot: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Strategy {
    /// Plain HTTP GET
    Http,
    /// Headless browser
    Browser,
}

impl Cli {
    fn overrides(self) -> Overrides {
        Overrides {
            issue_id: self.issue,
            base_url: self.base_url,
            output_path: self.output,
            strategy: self.strategy.map(|strategy| match strategy {
                Strategy::Http => StrategyKind::Http,
                Strategy::Browser => StrategyKind::Browser,
            }),
            browser: self.browser,
            wait_ms: self.wait_ms,
            no_snapshot: self.no_snapshot,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = issue_crawler_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CrawlConfig::load(path)?,
        None => CrawlConfig::builtin(),
    };
    config.apply(cli.overrides());

    let fetcher = config.fetch.build(&config.base_url)?;

    let spinner = issue_crawler_cli_utils::spinner(
        &multi,
        &format!("Fetching {}", config.issue_url()),
    );
    let outcome = run(&config, fetcher.as_ref()).await;
    spinner.finish_and_clear();

    match outcome? {
        CrawlOutcome::Written { path, .. } => {
            println!("Data written to {}", path.display());
        }
        CrawlOutcome::FetchFailed => {
            eprintln!("Could not fetch {}; no CSV written", config.issue_url());
        }
    }

    Ok(())
}
