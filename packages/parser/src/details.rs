//! Details list parser (`ul#issuedetails`).
//!
//! Each `li.item` holds a bold `strong.name` label and a `span.value` or
//! `div.value` element. Values are whitespace-normalized because they often
//! wrap links and icons across several lines.

use scraper::Html;

use crate::select::{collapsed_text, first, selector, trimmed_text};
use crate::{Fields, ParseError, Section};

selector!(ISSUE_DETAILS, "ul#issuedetails");
selector!(ITEM, "li.item");
selector!(NAME, "strong.name");
selector!(SPAN_VALUE, "span.value");
selector!(DIV_VALUE, "div.value");

/// Extracts label → value pairs from the details list.
///
/// Items without a label are ignored. An item with a label but no value
/// element maps to an empty string.
///
/// # Errors
///
/// Never fails today; the signature matches the other section parsers.
pub fn parse_details(document: &Html) -> Result<Section<Fields>, ParseError> {
    let Some(list) = document.select(&ISSUE_DETAILS).next() else {
        return Ok(Section::Missing);
    };

    let mut fields = Fields::new();

    for item in list.select(&ITEM) {
        let Some(name) = first(item, &NAME) else {
            log::trace!("Skipping details item without a label");
            continue;
        };
        let label = trimmed_text(name);
        let value = first(item, &SPAN_VALUE)
            .or_else(|| first(item, &DIV_VALUE))
            .map(collapsed_text)
            .unwrap_or_default();
        fields.push((label, value));
    }

    Ok(Section::Found(fields))
}
