//! Dates list parser (`div#datesmodule`).
//!
//! Values come from the `datetime` attribute of a nested `time` element
//! when there is one, which is stable across locales, and from the `dd`
//! text otherwise. The creation date additionally yields
//! [`CREATED_EPOCH_KEY`].

use issue_crawler_issue_models::{CREATED_EPOCH_KEY, CREATED_LABEL};
use scraper::Html;

use crate::select::{definition_pairs, first, selector, trimmed_text};
use crate::timestamp::epoch_seconds;
use crate::{Fields, ParseError, Section, SectionKind};

selector!(DATES_MODULE, "div#datesmodule");
selector!(TIME, "time");

/// Extracts `dt` → `dd` date pairs plus the derived creation epoch.
///
/// # Errors
///
/// Returns [`ParseError::Malformed`] for a `dd` without a preceding `dt` or
/// a `time` element without a `datetime` attribute, and
/// [`ParseError::Timestamp`] if the creation timestamp cannot be parsed.
pub fn parse_dates(document: &Html) -> Result<Section<Fields>, ParseError> {
    let Some(module) = document.select(&DATES_MODULE).next() else {
        return Ok(Section::Missing);
    };

    let mut fields = Fields::new();

    for pair in definition_pairs(module) {
        let (label, dd) = pair.map_err(|dd| {
            ParseError::malformed(
                SectionKind::Dates,
                format!("value '{}' has no preceding <dt>", trimmed_text(dd)),
            )
        })?;

        let Some(time) = first(dd, &TIME) else {
            fields.push((label, trimmed_text(dd)));
            continue;
        };

        let timestamp = time.value().attr("datetime").ok_or_else(|| {
            ParseError::malformed(
                SectionKind::Dates,
                format!("<time> for '{label}' has no datetime attribute"),
            )
        })?;

        let epoch = if label == CREATED_LABEL {
            Some(epoch_seconds(timestamp)?)
        } else {
            None
        };

        fields.push((label, timestamp.to_owned()));
        if let Some(epoch) = epoch {
            fields.push((CREATED_EPOCH_KEY.to_owned(), epoch.to_string()));
        }
    }

    Ok(Section::Found(fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(label: &str, value: &str) -> (String, String) {
        (label.to_owned(), value.to_owned())
    }

    #[test]
    fn prefers_datetime_attribute_and_derives_created_epoch() {
        let html = Html::parse_document(
            r#"<div id="datesmodule"><dl>
                 <dt>Created:</dt>
                 <dd><span><time class="livestamp" datetime="2016-12-14T14:42:08+0000">14/Dec/16 14:42</time></span></dd>
                 <dt>Resolved:</dt>
                 <dd><time datetime="2016-12-20T08:00:00+0000">20/Dec/16 08:00</time></dd>
                 <dt>Due:</dt>
                 <dd> Not set </dd>
               </dl></div>"#,
        );
        assert_eq!(
            parse_dates(&html).unwrap(),
            Section::Found(vec![
                pair("Created:", "2016-12-14T14:42:08+0000"),
                pair("Created Epoch", "1481726528"),
                pair("Resolved:", "2016-12-20T08:00:00+0000"),
                pair("Due:", "Not set"),
            ])
        );
    }

    #[test]
    fn created_without_time_element_has_no_epoch() {
        let html = Html::parse_document(
            r#"<div id="datesmodule"><dl><dt>Created:</dt><dd>14/Dec/16</dd></dl></div>"#,
        );
        assert_eq!(
            parse_dates(&html).unwrap(),
            Section::Found(vec![pair("Created:", "14/Dec/16")])
        );
    }

    #[test]
    fn unparseable_created_timestamp_fails() {
        let html = Html::parse_document(
            r#"<div id="datesmodule"><dl>
                 <dt>Created:</dt><dd><time datetime="2016-12-14">x</time></dd>
               </dl></div>"#,
        );
        assert!(matches!(
            parse_dates(&html).unwrap_err(),
            ParseError::Timestamp { .. }
        ));
    }

    #[test]
    fn other_labels_keep_unparseable_timestamps_verbatim() {
        let html = Html::parse_document(
            r#"<div id="datesmodule"><dl>
                 <dt>Updated:</dt><dd><time datetime="yesterday">x</time></dd>
               </dl></div>"#,
        );
        assert_eq!(
            parse_dates(&html).unwrap(),
            Section::Found(vec![pair("Updated:", "yesterday")])
        );
    }

    #[test]
    fn time_without_datetime_is_malformed() {
        let html = Html::parse_document(
            r#"<div id="datesmodule"><dl><dt>Created:</dt><dd><time>x</time></dd></dl></div>"#,
        );
        assert!(matches!(
            parse_dates(&html).unwrap_err(),
            ParseError::Malformed {
                section: SectionKind::Dates,
                ..
            }
        ));
    }

    #[test]
    fn orphan_dd_is_malformed() {
        let html = Html::parse_document(
            r#"<div id="datesmodule"><dl><dd>14/Dec/16</dd><dt>Created:</dt></dl></div>"#,
        );
        let err = parse_dates(&html).unwrap_err();
        assert!(
            matches!(
                err,
                ParseError::Malformed {
                    section: SectionKind::Dates,
                    ..
                }
            ),
            "unexpected error: {err}"
        );
        assert!(err.to_string().contains("14/Dec/16"), "unexpected error: {err}");
    }
}
