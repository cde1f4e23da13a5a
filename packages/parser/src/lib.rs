#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Extraction of structured issue data from a Jira issue page.
//!
//! Each section of the issue page template (details, people, dates,
//! description, activity) has its own parser that locates the section's
//! container and converts its markup into label → value pairs or text.
//! [`parse_issue`] runs all of them over one parsed document and merges
//! the results into an [`IssueRecord`].
//!
//! Every section parser follows the same policy:
//!
//! * a section that is not on the page is [`Section::Missing`], not an error;
//! * entries dropped for missing sub-elements make it [`Section::Partial`];
//! * structurally malformed markup or an unparseable timestamp is a
//!   [`ParseError`].

pub mod comments;
pub mod dates;
pub mod description;
pub mod details;
pub mod people;
pub mod timestamp;

mod select;

use std::collections::BTreeMap;

use issue_crawler_issue_models::{
    COMMENTS_KEY, Comment, DESCRIPTION_KEY, IssueRecord, join_comments,
};
use scraper::Html;
use strum_macros::{AsRefStr, Display};

/// Ordered label → value pairs extracted from a section.
///
/// Kept as a list so repeated labels are visible to callers; merging into
/// an [`IssueRecord`] lets later pairs win.
pub type Fields = Vec<(String, String)>;

/// The sections of the issue page template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum SectionKind {
    /// `ul#issuedetails`: type, status, priority, versions, ...
    Details,
    /// `div#peoplemodule`: assignee, reporter, votes, watchers.
    People,
    /// `div#datesmodule`: created, updated, resolved.
    Dates,
    /// `div#descriptionmodule`.
    Description,
    /// `div#activitymodule`: the comment thread.
    Comments,
}

/// Errors for markup that is present but does not have the expected shape.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A section container was found but its contents are malformed.
    #[error("Malformed {section} section: {reason}")]
    Malformed {
        /// Section the markup belongs to.
        section: SectionKind,
        /// What was wrong with it.
        reason: String,
    },

    /// A timestamp did not match `YYYY-MM-DDTHH:MM:SS±ZZZZ`.
    #[error("Invalid timestamp '{value}': {source}")]
    Timestamp {
        /// The offending timestamp text.
        value: String,
        /// Underlying chrono parse error.
        source: chrono::ParseError,
    },
}

impl ParseError {
    pub(crate) fn malformed(section: SectionKind, reason: impl Into<String>) -> Self {
        Self::Malformed {
            section,
            reason: reason.into(),
        }
    }
}

/// Outcome of parsing one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section<T> {
    /// The section's container is not on the page.
    Missing,
    /// The section was found and every entry in it was extracted.
    Found(T),
    /// The section was found but `skipped` entries lacked required
    /// sub-elements and were dropped.
    Partial {
        /// The entries that were extracted.
        value: T,
        /// Number of entries dropped.
        skipped: usize,
    },
}

impl<T: Default> Section<T> {
    /// Returns the extracted value, or `T::default()` when missing.
    #[must_use]
    pub fn into_value(self) -> T {
        match self {
            Self::Missing => T::default(),
            Self::Found(value) | Self::Partial { value, .. } => value,
        }
    }
}

impl<T> Section<T> {
    /// Builds `Found` or `Partial` depending on whether anything was
    /// dropped.
    #[must_use]
    pub const fn with_skipped(value: T, skipped: usize) -> Self {
        if skipped == 0 {
            Self::Found(value)
        } else {
            Self::Partial { value, skipped }
        }
    }

    /// Returns the status of this section without its value.
    #[must_use]
    pub const fn status(&self) -> SectionStatus {
        match self {
            Self::Missing => SectionStatus::Missing,
            Self::Found(_) => SectionStatus::Found,
            Self::Partial { skipped, .. } => SectionStatus::Partial { skipped: *skipped },
        }
    }
}

/// Value-free summary of a [`Section`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionStatus {
    /// See [`Section::Missing`].
    Missing,
    /// See [`Section::Found`].
    Found,
    /// See [`Section::Partial`].
    Partial {
        /// Number of entries dropped.
        skipped: usize,
    },
}

/// Result of parsing a whole issue page.
#[derive(Debug, Clone)]
pub struct ParsedIssue {
    /// Every extracted field plus the synthesized description and
    /// comments keys.
    pub record: IssueRecord,
    /// The comments that were kept, in document order.
    pub comments: Vec<Comment>,
    /// Per-section outcome.
    pub report: BTreeMap<SectionKind, SectionStatus>,
}

/// Parses an issue page and assembles its flat record.
///
/// Fields are merged in the order details → people → dates; a label seen
/// again overwrites the earlier value. `"Description"` and `"Comments"`
/// are always present in the result (empty when their sections are
/// missing).
///
/// # Errors
///
/// Returns [`ParseError`] if any section is malformed or carries a
/// timestamp that cannot be parsed.
pub fn parse_issue(html: &str) -> Result<ParsedIssue, ParseError> {
    let document = Html::parse_document(html);
    let mut report = BTreeMap::new();
    let mut record = IssueRecord::new();

    let field_sections = [
        (SectionKind::Details, details::parse_details(&document)?),
        (SectionKind::People, people::parse_people(&document)?),
        (SectionKind::Dates, dates::parse_dates(&document)?),
    ];
    for (kind, section) in field_sections {
        note(&mut report, kind, &section);
        for (label, value) in section.into_value() {
            if let Some(previous) = record.insert(label.as_str(), value) {
                log::debug!("[{kind}] '{label}' overwrote earlier value '{previous}'");
            }
        }
    }

    let description = description::parse_description(&document)?;
    note(&mut report, SectionKind::Description, &description);
    record.insert(DESCRIPTION_KEY, description.into_value());

    let comments = comments::parse_comments(&document)?;
    note(&mut report, SectionKind::Comments, &comments);
    let comments = comments.into_value();
    record.insert(COMMENTS_KEY, join_comments(&comments));

    log::info!(
        "Parsed {} fields and {} comments",
        record.len(),
        comments.len()
    );

    Ok(ParsedIssue {
        record,
        comments,
        report,
    })
}

fn note<T>(
    report: &mut BTreeMap<SectionKind, SectionStatus>,
    kind: SectionKind,
    section: &Section<T>,
) {
    let status = section.status();
    match status {
        SectionStatus::Missing => log::debug!("[{kind}] section not found"),
        SectionStatus::Found => log::debug!("[{kind}] section parsed"),
        SectionStatus::Partial { skipped } => {
            log::warn!("[{kind}] dropped {skipped} incomplete entries");
        }
    }
    report.insert(kind, status);
}

#[cfg(test)]
mod tests {
    use super::*;
    use issue_crawler_issue_models::{
        ASSIGNEE_LABEL, CREATED_EPOCH_KEY, CREATED_LABEL, IssueRow, TYPE_LABEL,
    };

    const PAGE: &str = r#"
        <html><body>
          <ul id="issuedetails">
            <li class="item"><strong class="name">Type:</strong>
              <span class="value">  Bug </span></li>
            <li class="item"><strong class="name">Status:</strong>
              <span class="value">Resolved</span></li>
          </ul>
          <div id="peoplemodule"><dl>
            <dt>Assignee:</dt><dd> Claus Ibsen </dd>
            <dt>Reporter:</dt><dd>Jane Doe</dd>
          </dl></div>
          <div id="datesmodule"><dl>
            <dt>Created:</dt><dd><time datetime="2016-12-14T14:42:08+0000">14/Dec/16 14:42</time></dd>
            <dt>Updated:</dt><dd><time datetime="2016-12-15T09:00:00+0000">15/Dec/16 09:00</time></dd>
          </dl></div>
          <div id="descriptionmodule">
            <div class="user-content-block"> The route fails to start. </div>
          </div>
          <div id="activitymodule">
            <div class="issue-data-block">
              <a class="user-hover">Claus Ibsen</a>
              <time class="livestamp" datetime="2016-12-14T15:00:00+0000">now</time>
              <div class="action-body">Thanks, fixed.</div>
            </div>
            <div class="issue-data-block">
              <a class="user-hover">Jane Doe</a>
              <div class="action-body">No timestamp here.</div>
            </div>
          </div>
        </body></html>
    "#;

    #[test]
    fn assembles_record_from_all_sections() {
        let parsed = parse_issue(PAGE).unwrap();
        let record = &parsed.record;

        assert_eq!(record.get(TYPE_LABEL), Some("Bug"));
        assert_eq!(record.get("Status:"), Some("Resolved"));
        assert_eq!(record.get(ASSIGNEE_LABEL), Some("Claus Ibsen"));
        assert_eq!(record.get("Reporter:"), Some("Jane Doe"));
        assert_eq!(record.get(CREATED_LABEL), Some("2016-12-14T14:42:08+0000"));
        assert_eq!(record.get(CREATED_EPOCH_KEY), Some("1481726528"));
        assert_eq!(record.get(DESCRIPTION_KEY), Some("The route fails to start."));
        assert_eq!(
            record.get(COMMENTS_KEY),
            Some("Claus Ibsen:1481727600:2016-12-14T15:00:00+0000:Thanks, fixed.")
        );
    }

    #[test]
    fn reports_partial_comment_section() {
        let parsed = parse_issue(PAGE).unwrap();
        assert_eq!(parsed.comments.len(), 1);
        assert_eq!(
            parsed.report.get(&SectionKind::Comments),
            Some(&SectionStatus::Partial { skipped: 1 })
        );
        assert_eq!(
            parsed.report.get(&SectionKind::Details),
            Some(&SectionStatus::Found)
        );
    }

    #[test]
    fn empty_page_yields_only_synthesized_keys() {
        let parsed = parse_issue("<html><body></body></html>").unwrap();
        assert_eq!(parsed.record.len(), 2);
        assert_eq!(parsed.record.get(DESCRIPTION_KEY), Some(""));
        assert_eq!(parsed.record.get(COMMENTS_KEY), Some(""));
        assert!(
            parsed
                .report
                .values()
                .all(|status| *status == SectionStatus::Missing)
        );
    }

    #[test]
    fn later_sections_overwrite_earlier_labels() {
        let html = r#"
            <ul id="issuedetails">
              <li class="item"><strong class="name">Assignee:</strong><span class="value">Nobody</span></li>
            </ul>
            <div id="peoplemodule"><dl><dt>Assignee:</dt><dd>Claus Ibsen</dd></dl></div>
        "#;
        let parsed = parse_issue(html).unwrap();
        assert_eq!(parsed.record.get(ASSIGNEE_LABEL), Some("Claus Ibsen"));
    }

    #[test]
    fn minimal_page_projects_to_row() {
        let html = r#"
            <ul id="issuedetails">
              <li class="item"><strong class="name">Type:</strong><span class="value">Bug</span></li>
            </ul>
            <div id="datesmodule"><dl>
              <dt>Created:</dt><dd><time datetime="2016-12-14T14:42:08+0000">x</time></dd>
            </dl></div>
            <div id="descriptionmodule"><div class="user-content-block">Broken</div></div>
        "#;
        let row = IssueRow::from(&parse_issue(html).unwrap().record);
        assert_eq!(row.issue_type, "Bug");
        assert_eq!(row.assignee, "");
        assert_eq!(row.created, "2016-12-14T14:42:08+0000");
        assert_eq!(row.created_epoch, "1481726528");
        assert_eq!(row.description, "Broken");
        assert_eq!(row.comments, "");
    }

    #[test]
    fn malformed_people_section_is_an_error() {
        let html = r#"<div id="peoplemodule"><dl><dd>orphan</dd></dl></div>"#;
        let err = parse_issue(html).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Malformed {
                section: SectionKind::People,
                ..
            }
        ));
    }

    #[test]
    fn bad_created_timestamp_is_an_error() {
        let html = r#"<div id="datesmodule"><dl>
            <dt>Created:</dt><dd><time datetime="14/Dec/16 14:42">x</time></dd>
        </dl></div>"#;
        assert!(matches!(
            parse_issue(html).unwrap_err(),
            ParseError::Timestamp { .. }
        ));
    }

    #[test]
    fn section_kind_displays_snake_case() {
        assert_eq!(SectionKind::Description.to_string(), "description");
        assert_eq!(SectionKind::Comments.as_ref(), "comments");
    }
}
