//! Citation marker removal for extracted article text
//!
//! Article bodies carry numeric footnote markers such as `[12]`. They are
//! removed without touching anything else: whitespace, Unicode and bracketed
//! notes like `[citation needed]` stay exactly as extracted.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static CITATION_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\d+\]").unwrap());

/// Remove every bracketed numeric citation marker
///
/// Removal is repeated until nothing matches, so a nested marker like
/// `[1[2]]` cannot leave a fresh `[1]` behind and the function is idempotent.
///
/// # Examples
///
/// ```
/// use wikiharvest::parser::sanitize::remove_citations;
///
/// assert_eq!(remove_citations("Fact[12] about X[3]."), "Fact about X.");
/// assert_eq!(remove_citations("Claim[citation needed]."), "Claim[citation needed].");
/// ```
pub fn remove_citations(text: &str) -> String {
    let mut current = Cow::Borrowed(text);

    loop {
        let next = match CITATION_REGEX.replace_all(&current, "") {
            Cow::Borrowed(_) => None,
            Cow::Owned(next) => Some(next),
        };

        match next {
            Some(next) => current = Cow::Owned(next),
            None => return current.into_owned(),
        }
    }
}

/// Check if text contains any citation marker
pub fn has_citations(text: &str) -> bool {
    CITATION_REGEX.is_match(text)
}
