//! Description parser (`div#descriptionmodule`).

use scraper::Html;

use crate::select::{first, selector, trimmed_text};
use crate::{ParseError, Section};

selector!(DESCRIPTION_MODULE, "div#descriptionmodule");
selector!(CONTENT_BLOCK, "div.user-content-block");

/// Extracts the trimmed description text.
///
/// The section is [`Section::Missing`] if either the module or its
/// `div.user-content-block` is absent.
///
/// # Errors
///
/// Never fails today; the signature matches the other section parsers.
pub fn parse_description(document: &Html) -> Result<Section<String>, ParseError> {
    let block = document
        .select(&DESCRIPTION_MODULE)
        .next()
        .and_then(|module| first(module, &CONTENT_BLOCK));

    Ok(block.map_or(Section::Missing, |block| Section::Found(trimmed_text(block))))
}
