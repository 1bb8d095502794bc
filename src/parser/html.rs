//! MediaWiki article parser
//!
//! Extracts the article title and the plain text of the content container
//! from a rendered article page.

use scraper::{ElementRef, Html};

use crate::models::Article;
use crate::parser::selectors::{CONTENT, DOCUMENT_TITLE, HEADING, NOISE, TITLE_SUFFIX};
use crate::utils::error::ParseError;

/// Article HTML parser
///
/// Title lookup order:
/// 1. `h1#firstHeading`
/// 2. `<title>` with the ` - Wikipedia` suffix removed
///
/// The body is the text of `div#mw-content-text` with style, script and
/// edit-section links left out.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArticleParser;

impl ArticleParser {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse a page into an [`Article`] with an uncleaned body
    ///
    /// # Errors
    /// Returns `ParseError::TitleNotFound` if neither heading nor document
    /// title is present, and `ParseError::ContentNotFound` if the content
    /// container is missing or holds only whitespace
    pub fn parse(&self, html: &str) -> Result<Article, ParseError> {
        let document = Html::parse_document(html);

        let title = self
            .extract_title(&document)
            .ok_or(ParseError::TitleNotFound)?;

        let body = self
            .extract_body(&document)
            .ok_or(ParseError::ContentNotFound)?;

        Ok(Article::new(title, body))
    }

    fn extract_title(&self, document: &Html) -> Option<String> {
        let heading = document
            .select(&HEADING)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty());

        heading.or_else(|| {
            document
                .select(&DOCUMENT_TITLE)
                .next()
                .map(|el| {
                    let text = el.text().collect::<String>();
                    let text = text.trim();
                    text.strip_suffix(TITLE_SUFFIX).unwrap_or(text).trim().to_string()
                })
                .filter(|t| !t.is_empty())
        })
    }

    fn extract_body(&self, document: &Html) -> Option<String> {
        let container = document.select(&CONTENT).next()?;

        let mut text = String::new();
        collect_text(container, &mut text);

        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }
}

/// Append the text of `element` to `out`, skipping noise subtrees
fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if NOISE.matches(&child_element) {
                continue;
            }
            collect_text(child_element, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(head: &str, body: &str) -> String {
        format!("<!DOCTYPE html><html><head>{head}</head><body>{body}</body></html>")
    }

    #[test]
    fn test_parse_heading_and_content() {
        let html = page(
            "<title>Albert Einstein - Wikipedia</title>",
            r#"<h1 id="firstHeading"><span>Albert Einstein</span></h1>
            <div id="mw-content-text"><p>Albert Einstein was a physicist.[1]</p></div>"#,
        );

        let article = ArticleParser::new().parse(&html).unwrap();
        assert_eq!(article.title, "Albert Einstein");
        assert_eq!(article.raw_body, "Albert Einstein was a physicist.[1]");
    }

    #[test]
    fn test_title_fallback_strips_site_suffix() {
        let html = page(
            "<title>Albert Einstein - Wikipedia</title>",
            r#"<div id="mw-content-text">Body</div>"#,
        );

        let article = ArticleParser::new().parse(&html).unwrap();
        assert_eq!(article.title, "Albert Einstein");
    }

    #[test]
    fn test_plain_document_title_used_verbatim() {
        let html = page(
            "<title>Test Article</title>",
            r#"<div id="mw-content-text">History[1] of testing[22].</div>"#,
        );

        let article = ArticleParser::new().parse(&html).unwrap();
        assert_eq!(article.title, "Test Article");
        assert_eq!(article.raw_body, "History[1] of testing[22].");
    }

    #[test]
    fn test_missing_title() {
        let html = page("", r#"<div id="mw-content-text">Body</div>"#);
        let result = ArticleParser::new().parse(&html);
        assert!(matches!(result, Err(ParseError::TitleNotFound)));
    }

    #[test]
    fn test_missing_content() {
        let html = page("<title>Stub</title>", "<div id=\"other\">Body</div>");
        let result = ArticleParser::new().parse(&html);
        assert!(matches!(result, Err(ParseError::ContentNotFound)));
    }

    #[test]
    fn test_whitespace_only_content() {
        let html = page("<title>Stub</title>", "<div id=\"mw-content-text\">  \n </div>");
        let result = ArticleParser::new().parse(&html);
        assert!(matches!(result, Err(ParseError::ContentNotFound)));
    }

    #[test]
    fn test_noise_elements_skipped() {
        let html = page(
            "<title>Rust</title>",
            r#"<div id="mw-content-text">
                <style>.mw-parser-output{color:red}</style>
                <h2>History<span class="mw-editsection">[edit]</span></h2>
                <p>Rust is an alloy.</p>
                <script>var x = 1;</script>
            </div>"#,
        );

        let article = ArticleParser::new().parse(&html).unwrap();
        assert!(article.raw_body.contains("History"));
        assert!(article.raw_body.contains("Rust is an alloy."));
        assert!(!article.raw_body.contains("[edit]"));
        assert!(!article.raw_body.contains("color:red"));
        assert!(!article.raw_body.contains("var x"));
    }
}
