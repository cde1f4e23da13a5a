#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Issue record types shared across the issue crawler.
//!
//! An [`IssueRecord`] is an open-ended label → value mapping built from
//! whatever labels the issue page exposes. [`IssueRow`] is the fixed
//! six-column projection of a record that ends up in the CSV output.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Record key for the issue type in the details list.
pub const TYPE_LABEL: &str = "Type:";
/// Record key for the assignee in the people list.
pub const ASSIGNEE_LABEL: &str = "Assignee:";
/// Record key for the creation timestamp in the dates list.
pub const CREATED_LABEL: &str = "Created:";
/// Derived record key holding the creation time as Unix epoch seconds.
pub const CREATED_EPOCH_KEY: &str = "Created Epoch";
/// Synthesized record key holding the description text.
pub const DESCRIPTION_KEY: &str = "Description";
/// Synthesized record key holding the encoded comment thread.
pub const COMMENTS_KEY: &str = "Comments";

/// Separator placed between encoded comments in [`COMMENTS_KEY`].
pub const COMMENT_SEPARATOR: &str = "; ";

/// Flat label → value mapping extracted from one issue page.
///
/// Keys are page labels verbatim (including the trailing colon, e.g.
/// `"Type:"`) plus the derived keys above. Inserting an existing key
/// replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueRecord {
    fields: BTreeMap<String, String>,
}

impl IssueRecord {
    /// Creates an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Sets `key` to `value`, returning the value it replaced, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.fields.insert(key.into(), value.into())
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Returns the value stored under `key`, or `""` when absent.
    #[must_use]
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    /// Number of fields in the record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record holds no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A single comment from the issue's activity thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Display name of the comment author.
    pub author: String,
    /// Timestamp as it appears in the page (`YYYY-MM-DDTHH:MM:SS±ZZZZ`).
    pub timestamp: String,
    /// [`Self::timestamp`] as Unix epoch seconds.
    pub epoch: i64,
    /// Comment body text.
    pub body: String,
}

impl Comment {
    /// Encodes the comment as `author:epoch:timestamp:body`.
    ///
    /// No escaping is applied, so the encoding is ambiguous when any field
    /// contains `:` or `; `.
    #[must_use]
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.author, self.epoch, self.timestamp, self.body
        )
    }
}

/// Joins encoded comments with [`COMMENT_SEPARATOR`], preserving order.
#[must_use]
pub fn join_comments(comments: &[Comment]) -> String {
    comments
        .iter()
        .map(Comment::encode)
        .collect::<Vec<_>>()
        .join(COMMENT_SEPARATOR)
}

/// The fixed six-column CSV projection of an [`IssueRecord`].
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IssueRow {
    /// Issue type (`Type:`).
    #[serde(rename = "Type")]
    pub issue_type: String,
    /// Assignee display name (`Assignee:`).
    #[serde(rename = "Assignee")]
    pub assignee: String,
    /// Creation timestamp (`Created:`).
    #[serde(rename = "Created")]
    pub created: String,
    /// Creation time as epoch seconds.
    #[serde(rename = "Created Epoch")]
    pub created_epoch: String,
    /// Description text.
    #[serde(rename = "Description")]
    pub description: String,
    /// Encoded comment thread.
    #[serde(rename = "Comments")]
    pub comments: String,
}

impl IssueRow {
    /// Column headers in output order.
    pub const HEADERS: [&'static str; 6] = [
        "Type",
        "Assignee",
        "Created",
        "Created Epoch",
        "Description",
        "Comments",
    ];
}

impl From<&IssueRecord> for IssueRow {
    fn from(record: &IssueRecord) -> Self {
        let field = |key: &str| record.get_or_empty(key).to_owned();
        Self {
            issue_type: field(TYPE_LABEL),
            assignee: field(ASSIGNEE_LABEL),
            created: field(CREATED_LABEL),
            created_epoch: field(CREATED_EPOCH_KEY),
            description: field(DESCRIPTION_KEY),
            comments: field(COMMENTS_KEY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(author: &str, body: &str) -> Comment {
        Comment {
            author: author.to_owned(),
            timestamp: "2016-12-14T14:42:08+0000".to_owned(),
            epoch: 1_481_726_528,
            body: body.to_owned(),
        }
    }

    #[test]
    fn encodes_comment_fields_in_order() {
        assert_eq!(
            comment("Claus Ibsen", "Thanks for the PR").encode(),
            "Claus Ibsen:1481726528:2016-12-14T14:42:08+0000:Thanks for the PR"
        );
    }

    #[test]
    fn joins_comments_with_separator() {
        let joined = join_comments(&[comment("a", "first"), comment("b", "second")]);
        assert_eq!(
            joined,
            "a:1481726528:2016-12-14T14:42:08+0000:first; b:1481726528:2016-12-14T14:42:08+0000:second"
        );
    }

    #[test]
    fn joins_no_comments_to_empty_string() {
        assert_eq!(join_comments(&[]), "");
    }

    #[test]
    fn insert_overwrites_existing_key() {
        let mut record = IssueRecord::new();
        assert!(record.is_empty());
        assert_eq!(record.insert("Status:", "Open"), None);
        assert_eq!(
            record.insert("Status:", "Resolved"),
            Some("Open".to_owned())
        );
        assert_eq!(record.get("Status:"), Some("Resolved"));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn row_projects_known_labels() {
        let mut record = IssueRecord::new();
        record.insert(TYPE_LABEL, "Bug");
        record.insert(ASSIGNEE_LABEL, "Claus Ibsen");
        record.insert(CREATED_LABEL, "2016-12-14T14:42:08+0000");
        record.insert(CREATED_EPOCH_KEY, "1481726528");
        record.insert(DESCRIPTION_KEY, "Something broke");
        record.insert("Priority:", "Major");

        let row = IssueRow::from(&record);
        assert_eq!(row.issue_type, "Bug");
        assert_eq!(row.assignee, "Claus Ibsen");
        assert_eq!(row.created, "2016-12-14T14:42:08+0000");
        assert_eq!(row.created_epoch, "1481726528");
        assert_eq!(row.description, "Something broke");
        assert_eq!(row.comments, "");
    }

    #[test]
    fn row_defaults_missing_fields_to_empty() {
        assert_eq!(IssueRow::from(&IssueRecord::new()), IssueRow::default());
    }
}
