//! People list parser (`div#peoplemodule`).

use scraper::Html;

use crate::select::{definition_pairs, selector, trimmed_text};
use crate::{Fields, ParseError, Section, SectionKind};

selector!(PEOPLE_MODULE, "div#peoplemodule");

/// Extracts `dt` → `dd` pairs (assignee, reporter, votes, watchers).
///
/// # Errors
///
/// Returns [`ParseError::Malformed`] if a `dd` has no preceding `dt`.
pub fn parse_people(document: &Html) -> Result<Section<Fields>, ParseError> {
    let Some(module) = document.select(&PEOPLE_MODULE).next() else {
        return Ok(Section::Missing);
    };

    let fields = definition_pairs(module)
        .map(|pair| {
            pair.map(|(label, dd)| (label, trimmed_text(dd))).map_err(|dd| {
                ParseError::malformed(
                    SectionKind::People,
                    format!("value '{}' has no preceding <dt>", trimmed_text(dd)),
                )
            })
        })
        .collect::<Result<Fields, _>>()?;

    Ok(Section::Found(fields))
}
