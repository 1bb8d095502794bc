//! Error types for the harvester stages
//!
//! Each stage of the ingestion loop has its own error enum so callers can
//! match on the exact failure; [`crate::error::Error`] unifies them.

use thiserror::Error;

/// Errors that can occur while fetching a random article
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error (connection refused, DNS, TLS, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status code
    #[error("Server error: {0}")]
    ServerError(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Invalid endpoint URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Errors that can occur while extracting title and body from a page
#[derive(Error, Debug)]
pub enum ParseError {
    /// Title not found in HTML
    #[error("Title not found in article")]
    TitleNotFound,

    /// Content container missing or empty
    #[error("Content not found in article")]
    ContentNotFound,
}

/// Errors raised by language detection
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LanguageError {
    /// The detector could not classify the text at all
    #[error("No language could be detected in text")]
    Undetectable,

    /// A language was found but the detector flagged it as unreliable
    #[error("Language detection unreliable (best guess: {code}, confidence {confidence:.2})")]
    Unreliable { code: String, confidence: f64 },
}

/// Errors raised by the key-value store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Could not open a connection to the store
    #[error("Failed to connect to store at {address}: {source}")]
    Connection {
        address: String,
        #[source]
        source: redis::RedisError,
    },

    /// A command failed after the connection was established
    #[error("Store command {command} failed: {source}")]
    Command {
        command: &'static str,
        #[source]
        source: redis::RedisError,
    },
}

impl StoreError {
    pub(crate) fn command(command: &'static str) -> impl FnOnce(redis::RedisError) -> Self {
        move |source| Self::Command { command, source }
    }
}
