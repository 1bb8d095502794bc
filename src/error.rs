//! Unified error handling for the wikiharvest crate
//!
//! Stage-specific errors live in [`crate::utils::error`]; this module wraps
//! them into a single [`Error`] and decides which failures the harvest loop
//! may survive.
//!
//! # Recovery policy
//!
//! | Failure                         | Recoverable |
//! |---------------------------------|-------------|
//! | page could not be parsed        | yes         |
//! | non-success HTTP status         | yes         |
//! | connection failure or timeout   | no          |
//! | any store failure               | no          |
//!
//! Language rejections never become an [`Error`]; the gate reports them as
//! [`crate::models::RejectReason`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use wikiharvest::error::{Error, ErrorCategory};
//!
//! fn handle_error(err: Error) {
//!     if err.is_recoverable() {
//!         tracing::warn!(error = %err, "Skipping iteration");
//!     } else {
//!         tracing::error!(error = %err, "Fatal error");
//!     }
//! }
//! ```

use thiserror::Error;

pub use crate::utils::error::{FetchError, LanguageError, ParseError, StoreError};

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (HTTP, timeout, status)
    Network,
    /// Parsing and data extraction errors
    Parsing,
    /// Key-value store errors
    Storage,
}

impl ErrorCategory {
    /// Short label used in log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Parsing => "parsing",
            Self::Storage => "storage",
        }
    }
}

/// Unified error type for the harvest loop
#[derive(Error, Debug)]
pub enum Error {
    /// Fetch-specific errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Parse-specific errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl Error {
    /// Check if the harvest loop may continue after this error
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Fetch(FetchError::ServerError(_)) => true,
            Self::Fetch(_) => false,
            Self::Parse(_) => true,
            Self::Store(_) => false,
        }
    }

    /// Get the error category for handling strategies
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Fetch(_) => ErrorCategory::Network,
            Self::Parse(_) => ErrorCategory::Parsing,
            Self::Store(_) => ErrorCategory::Storage,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category() {
        let fetch_err = Error::Fetch(FetchError::Timeout);
        assert_eq!(fetch_err.category(), ErrorCategory::Network);

        let parse_err = Error::Parse(ParseError::TitleNotFound);
        assert_eq!(parse_err.category(), ErrorCategory::Parsing);
        assert_eq!(parse_err.category().as_str(), "parsing");
    }

    #[test]
    fn test_network_failures_are_fatal() {
        assert!(!Error::Fetch(FetchError::Timeout).is_recoverable());
        assert!(!Error::Fetch(FetchError::InvalidUrl("x".into())).is_recoverable());
    }

    #[test]
    fn test_status_and_parse_failures_are_recoverable() {
        assert!(Error::Fetch(FetchError::ServerError(503)).is_recoverable());
        assert!(Error::Parse(ParseError::ContentNotFound).is_recoverable());
    }

    #[test]
    fn test_store_failures_are_fatal() {
        let err: Error = StoreError::Command {
            command: "SET",
            source: redis::RedisError::from((redis::ErrorKind::IoError, "connection reset")),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Storage);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_error_conversion() {
        let unified: Error = ParseError::TitleNotFound.into();
        assert!(matches!(unified, Error::Parse(_)));
        assert_eq!(unified.to_string(), "Parse error: Title not found in article");
    }
}
