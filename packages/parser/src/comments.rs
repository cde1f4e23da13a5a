//! Comment thread parser (`div#activitymodule`).
//!
//! Each `div.issue-data-block` is one comment. A comment is kept only when
//! its author link, timestamp, and body are all present; blocks missing any
//! of them are dropped and counted. Comments are returned in document
//! order, which is not necessarily chronological.

use issue_crawler_issue_models::Comment;
use scraper::{ElementRef, Html};

use crate::select::{first, selector, trimmed_text};
use crate::timestamp::epoch_seconds;
use crate::{ParseError, Section, SectionKind};

selector!(ACTIVITY_MODULE, "div#activitymodule");
selector!(COMMENT_BLOCK, "div.issue-data-block");
selector!(AUTHOR, "a.user-hover");
selector!(TIMESTAMP, "time.livestamp");
selector!(BODY, "div.action-body");

/// Extracts every complete comment from the activity module.
///
/// # Errors
///
/// Returns [`ParseError::Malformed`] for a timestamp element without a
/// `datetime` attribute and [`ParseError::Timestamp`] if its value cannot be
/// parsed.
pub fn parse_comments(document: &Html) -> Result<Section<Vec<Comment>>, ParseError> {
    let Some(module) = document.select(&ACTIVITY_MODULE).next() else {
        log::warn!("No activity module found; the comment thread may not have rendered");
        return Ok(Section::Missing);
    };

    let mut comments = Vec::new();
    let mut skipped = 0;

    for (index, block) in module.select(&COMMENT_BLOCK).enumerate() {
        if let Some(comment) = parse_comment(block)? {
            comments.push(comment);
        } else {
            log::debug!("Dropping comment block {index}: missing author, timestamp, or body");
            skipped += 1;
        }
    }

    Ok(Section::with_skipped(comments, skipped))
}

/// Parses one comment block, returning `None` if a required part is absent.
fn parse_comment(block: ElementRef<'_>) -> Result<Option<Comment>, ParseError> {
    let (Some(author), Some(time), Some(body)) = (
        first(block, &AUTHOR),
        first(block, &TIMESTAMP),
        first(block, &BODY),
    ) else {
        return Ok(None);
    };

    let author = trimmed_text(author);
    let timestamp = time.value().attr("datetime").ok_or_else(|| {
        ParseError::malformed(
            SectionKind::Comments,
            format!("comment by '{author}' has a timestamp without a datetime attribute"),
        )
    })?;

    Ok(Some(Comment {
        epoch: epoch_seconds(timestamp)?,
        timestamp: timestamp.to_owned(),
        author,
        body: trimmed_text(body),
    }))
}
