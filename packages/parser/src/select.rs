//! Selector and text helpers shared by the section parsers.

use scraper::{ElementRef, Selector};

/// Declares a lazily compiled, process-wide CSS selector.
macro_rules! selector {
    ($name:ident, $css:literal) => {
        static $name: std::sync::LazyLock<scraper::Selector> = std::sync::LazyLock::new(|| {
            scraper::Selector::parse($css).expect("valid selector")
        });
    };
}

pub(crate) use selector;

selector!(DD, "dd");

/// All descendant text of `element`, trimmed.
pub fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}

/// All descendant text of `element` with whitespace runs collapsed to a
/// single space.
pub fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// First descendant of `element` matching `selector`.
pub fn first<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    element.select(selector).next()
}

/// Nearest preceding sibling element named `name`.
pub fn preceding_sibling<'a>(element: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    element
        .prev_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == name)
}

/// Every `dd` inside `container`, paired with the trimmed text of its `dt`.
///
/// Yields `Err(dd)` for a `dd` that has no preceding `dt` sibling.
pub fn definition_pairs(
    container: ElementRef<'_>,
) -> impl Iterator<Item = Result<(String, ElementRef<'_>), ElementRef<'_>>> {
    container.select(&DD).map(|dd| {
        preceding_sibling(dd, "dt")
            .map(|dt| (trimmed_text(dt), dd))
            .ok_or(dd)
    })
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::{collapsed_text, definition_pairs, trimmed_text};

    selector!(SPAN, "span");
    selector!(DL, "dl");

    #[test]
    fn collapses_internal_whitespace() {
        let html = Html::parse_fragment("<span>  Fix \n\t Version   3.15 </span>");
        let span = html.select(&SPAN).next().unwrap();
        assert_eq!(collapsed_text(span), "Fix Version 3.15");
    }

    #[test]
    fn pairs_dd_with_nearest_preceding_dt() {
        let html = Html::parse_fragment(
            "<dl><dt> Votes: </dt><dd>0</dd><dt>Watchers:</dt><dd>3</dd><dd>extra</dd></dl>",
        );
        let dl = html.select(&DL).next().unwrap();
        let pairs: Vec<(String, String)> = definition_pairs(dl)
            .map(|pair| {
                let (label, dd) = pair.unwrap();
                (label, trimmed_text(dd))
            })
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Votes:".to_owned(), "0".to_owned()),
                ("Watchers:".to_owned(), "3".to_owned()),
                ("Watchers:".to_owned(), "extra".to_owned()),
            ]
        );
    }

    #[test]
    fn dd_without_dt_is_reported() {
        let html = Html::parse_fragment("<dl><dd>orphan</dd></dl>");
        let dl = html.select(&DL).next().unwrap();
        let pair = definition_pairs(dl).next().unwrap();
        assert_eq!(pair.map(|(label, _)| label).map_err(trimmed_text), Err("orphan".to_owned()));
    }
}
