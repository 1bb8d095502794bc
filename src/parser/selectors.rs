//! CSS selectors for MediaWiki article pages

use lazy_static::lazy_static;
use scraper::Selector;

// Helper macro to parse selectors safely at compile time
macro_rules! parse_selector {
    ($s:expr) => {
        Selector::parse($s).expect(concat!("Invalid CSS selector: ", $s))
    };
}

/// Suffix MediaWiki appends to the document `<title>`
pub const TITLE_SUFFIX: &str = " - Wikipedia";

lazy_static! {
    /// Rendered page heading, holds the bare article title
    pub static ref HEADING: Selector = parse_selector!("h1#firstHeading");

    /// Document title, fallback when the heading is missing
    pub static ref DOCUMENT_TITLE: Selector = parse_selector!("title");

    /// Container holding the rendered article body
    pub static ref CONTENT: Selector = parse_selector!("div#mw-content-text");

    /// Elements inside the body whose text is never article prose
    pub static ref NOISE: Selector = parse_selector!("style, script, noscript, .mw-editsection");
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_selectors_match_mediawiki_markup() {
        let html = Html::parse_document(
            r#"<html><head><title>Rust - Wikipedia</title></head><body>
            <h1 id="firstHeading">Rust</h1>
            <div id="mw-content-text"><p>Rust is an alloy.</p><style>.x{}</style></div>
            </body></html>"#,
        );

        assert_eq!(html.select(&HEADING).count(), 1);
        assert_eq!(html.select(&DOCUMENT_TITLE).count(), 1);
        assert_eq!(html.select(&CONTENT).count(), 1);
        assert_eq!(html.select(&NOISE).count(), 1);
    }
}
