#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CSV export of a single issue record.
//!
//! Writes the [`IssueRow`] projection of an [`IssueRecord`] as a header
//! line plus one data row. Quoting follows RFC 4180: fields containing
//! commas, quotes, or line breaks are quoted and embedded quotes doubled.

use std::io::Write;
use std::path::Path;

use issue_crawler_issue_models::{IssueRecord, IssueRow};

/// Output file used when none is configured.
pub const DEFAULT_OUTPUT_PATH: &str = "camel_issues.csv";

/// Errors that can occur while writing CSV output.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Serializing or writing a CSV record failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Flushing the underlying writer failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// CSV writer settings: header from [`IssueRow`] field names, CRLF record
/// terminators, quoting only where needed.
fn builder() -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder
        .has_headers(true)
        .terminator(csv::Terminator::CRLF)
        .quote_style(csv::QuoteStyle::Necessary);
    builder
}

/// Writes the header and the record's row to `writer`.
///
/// # Errors
///
/// Returns [`ExportError`] if serialization or writing fails.
pub fn write_row_to<W: Write>(writer: W, record: &IssueRecord) -> Result<(), ExportError> {
    let mut csv_writer = builder().from_writer(writer);
    csv_writer.serialize(IssueRow::from(record))?;
    csv_writer.flush()?;
    Ok(())
}

/// Writes the record to a CSV file at `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`ExportError`] if the file cannot be created or written.
pub fn write_to_csv(record: &IssueRecord, path: &Path) -> Result<(), ExportError> {
    let mut csv_writer = builder().from_path(path)?;
    csv_writer.serialize(IssueRow::from(record))?;
    csv_writer.flush()?;

    log::debug!("Wrote 1 row to {}", path.display());
    Ok(())
}
