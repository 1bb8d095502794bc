// Core data structures for the harvest loop

use chrono::{DateTime, Utc};
use std::fmt;

/// Raw page returned by the article source
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects (the concrete article URL)
    pub url: String,
    pub status: u16,
    pub html: String,
}

/// Article extracted from one fetched page
///
/// Lives for a single loop iteration; only `title` (inside the key) and
/// `cleaned_body` reach the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub raw_body: String,
    pub cleaned_body: String,
}

impl Article {
    /// Create an article whose body has not been cleaned yet
    pub fn new(title: impl Into<String>, raw_body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            raw_body: raw_body.into(),
            cleaned_body: String::new(),
        }
    }
}

/// Why an article was rejected by the language gate
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// Detection succeeded but the language is not accepted
    NonEnglish { code: String },
    /// The detector could not give a usable answer
    DetectionFailed { message: String },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonEnglish { code } => write!(f, "non-English article (detected {code})"),
            Self::DetectionFailed { message } => write!(f, "language detection failed: {message}"),
        }
    }
}

/// Result of one pass through the harvest loop
#[derive(Debug, Clone, PartialEq)]
pub enum IterationOutcome {
    /// Cleaned body written to the store
    Stored {
        title: String,
        key: String,
        /// An earlier record under the same key was replaced
        replaced: bool,
        /// Size of the stored value in bytes
        bytes: usize,
    },
    /// Article rejected by the language gate; nothing written
    Rejected { title: String, reason: RejectReason },
    /// Page abandoned because of a recoverable error; nothing written
    Skipped { reason: String },
}

impl IterationOutcome {
    /// Whether this iteration wrote to the store
    pub fn is_stored(&self) -> bool {
        matches!(self, Self::Stored { .. })
    }
}

/// Running counters for a harvest session
#[derive(Debug, Clone)]
pub struct HarvestStats {
    pub iterations: u64,
    pub created: u64,
    pub replaced: u64,
    pub rejected_language: u64,
    pub rejected_detection: u64,
    pub skipped_pages: u64,
    pub bytes_stored: u64,
    pub started_at: DateTime<Utc>,
}

impl Default for HarvestStats {
    fn default() -> Self {
        Self::new()
    }
}

impl HarvestStats {
    pub fn new() -> Self {
        Self {
            iterations: 0,
            created: 0,
            replaced: 0,
            rejected_language: 0,
            rejected_detection: 0,
            skipped_pages: 0,
            bytes_stored: 0,
            started_at: Utc::now(),
        }
    }

    /// Record an iteration outcome
    pub fn record(&mut self, outcome: &IterationOutcome) {
        self.iterations += 1;
        match outcome {
            IterationOutcome::Stored {
                replaced, bytes, ..
            } => {
                if *replaced {
                    self.replaced += 1;
                } else {
                    self.created += 1;
                }
                self.bytes_stored += *bytes as u64;
            }
            IterationOutcome::Rejected {
                reason: RejectReason::NonEnglish { .. },
                ..
            } => self.rejected_language += 1,
            IterationOutcome::Rejected {
                reason: RejectReason::DetectionFailed { .. },
                ..
            } => self.rejected_detection += 1,
            IterationOutcome::Skipped { .. } => self.skipped_pages += 1,
        }
    }

    /// Total records written (new + replaced)
    pub fn stored(&self) -> u64 {
        self.created + self.replaced
    }

    /// Fraction of iterations that ended in a store write
    pub fn acceptance_rate(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.stored() as f64 / self.iterations as f64
        }
    }

    /// Elapsed time in seconds since the session started
    pub fn elapsed_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
