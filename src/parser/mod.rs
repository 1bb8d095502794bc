//! HTML parsing and text cleaning
//!
//! [`ArticleParser`] turns a fetched page into an [`crate::models::Article`];
//! [`sanitize::remove_citations`] strips footnote markers from its body.

pub mod html;
pub mod sanitize;
pub mod selectors;

pub use html::ArticleParser;
pub use sanitize::remove_citations;
