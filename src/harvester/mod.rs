//! The sequential ingestion loop
//!
//! ```text
//! FETCH ──▶ PARSE ──▶ FILTER ──▶ CLEAN ──▶ STORE ──▶ SLEEP ──┐
//!   ▲                   │                                     │
//!   │                   └── reject ─────────────▶ SLEEP ──────┤
//!   └─────────────────────────────────────────────────────────┘
//! ```
//!
//! One iteration runs to completion before the next starts, so the store
//! only ever sees a single writer. Recoverable failures become
//! [`IterationOutcome::Skipped`]; fatal ones end [`Harvester::run`] with an
//! error and the caller decides whether to exit.
//!
//! # Example
//!
//! ```no_run
//! use wikiharvest::config::Config;
//! use wikiharvest::crawler::WikiFetcher;
//! use wikiharvest::harvester::Harvester;
//! use wikiharvest::language::{LanguageGate, WhatlangDetector};
//! use wikiharvest::storage::RedisStore;
//! use wikiharvest::throttle::JitterPacer;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let store = RedisStore::connect(&config.store).await?;
//! let mut harvester = Harvester::new(
//!     WikiFetcher::new(&config.source)?,
//!     LanguageGate::from_config(WhatlangDetector::new(), &config.language),
//!     store,
//!     JitterPacer::from_config(&config.throttle),
//!     config.store.key_prefix.clone(),
//! );
//! harvester.run(None).await?;
//! # Ok(())
//! # }
//! ```

use std::future::Future;

use crate::crawler::ArticleSource;
use crate::error::Result;
use crate::language::{LanguageDetector, LanguageGate};
use crate::models::{HarvestStats, IterationOutcome, RejectReason};
use crate::parser::{remove_citations, ArticleParser};
use crate::storage::{article_key, store_article, ArticleStore, WriteOutcome};
use crate::throttle::Pacer;
use crate::utils::error::ParseError;
use crate::utils::{format_bytes, truncate_text};

/// Iterations between periodic progress summaries
const STATS_LOG_INTERVAL: u64 = 50;

/// Fetch → parse → filter → clean → store loop over owned collaborators
pub struct Harvester<S, D, K, P> {
    source: S,
    parser: ArticleParser,
    gate: LanguageGate<D>,
    store: K,
    pacer: P,
    key_prefix: String,
    stats: HarvestStats,
}

impl<S, D, K, P> Harvester<S, D, K, P>
where
    S: ArticleSource,
    D: LanguageDetector,
    K: ArticleStore,
    P: Pacer,
{
    pub fn new(
        source: S,
        gate: LanguageGate<D>,
        store: K,
        pacer: P,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            source,
            parser: ArticleParser::new(),
            gate,
            store,
            pacer,
            key_prefix: key_prefix.into(),
            stats: HarvestStats::new(),
        }
    }

    /// Counters for this session
    pub fn stats(&self) -> &HarvestStats {
        &self.stats
    }

    /// The store articles are written to
    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    /// Run one FETCH → STORE pass without pausing or classifying errors
    ///
    /// Language rejections are returned as `Ok(IterationOutcome::Rejected)`;
    /// every other failure is returned as `Err`.
    pub async fn run_once(&self) -> Result<IterationOutcome> {
        let page = self.source.fetch_random().await?;

        let mut article = self.parser.parse(&page.html)?;
        tracing::debug!(title = %article.title, url = %page.url, "Parsed article");

        match self.gate.check(&article.raw_body) {
            Ok(detection) => {
                tracing::debug!(
                    title = %article.title,
                    language = %detection.code,
                    confidence = detection.confidence,
                    "Language accepted"
                );
            }
            Err(reason) => {
                match &reason {
                    RejectReason::NonEnglish { code } => {
                        tracing::info!(title = %article.title, language = %code, "Skipping non-English article");
                    }
                    RejectReason::DetectionFailed { message } => {
                        tracing::warn!(
                            title = %article.title,
                            error = %message,
                            "Skipping article due to error during language detection"
                        );
                    }
                }
                return Ok(IterationOutcome::Rejected {
                    title: article.title,
                    reason,
                });
            }
        }

        article.cleaned_body = remove_citations(&article.raw_body);
        if article.cleaned_body.trim().is_empty() {
            return Err(ParseError::ContentNotFound.into());
        }

        let key = article_key(&self.key_prefix, &article.title);
        let outcome = store_article(&self.store, &key, &article.cleaned_body).await?;

        let replaced = outcome == WriteOutcome::Replaced;
        if replaced {
            tracing::info!(title = %article.title, "Article has been visited before, content updated");
        } else {
            tracing::info!(
                title = %article.title,
                preview = %truncate_text(&article.cleaned_body, 60),
                "New article found, content saved"
            );
        }

        Ok(IterationOutcome::Stored {
            title: article.title,
            key,
            replaced,
            bytes: article.cleaned_body.len(),
        })
    }

    /// Run one pass, turn recoverable errors into skips and update the counters
    ///
    /// # Errors
    /// Returns the error unchanged when it is not recoverable
    pub async fn iterate(&mut self) -> Result<IterationOutcome> {
        let outcome = match self.run_once().await {
            Ok(outcome) => outcome,
            Err(e) if e.is_recoverable() => {
                tracing::warn!(
                    error = %e,
                    category = e.category().as_str(),
                    "Skipping article after recoverable error"
                );
                IterationOutcome::Skipped {
                    reason: e.to_string(),
                }
            }
            Err(e) => {
                tracing::error!(error = %e, category = e.category().as_str(), "Fatal harvest error");
                return Err(e);
            }
        };

        self.stats.record(&outcome);

        if self.stats.iterations % STATS_LOG_INTERVAL == 0 {
            self.log_stats();
        }

        Ok(outcome)
    }

    /// Loop forever, or for `max_iterations` when given
    ///
    /// # Errors
    /// Returns the first fatal error
    pub async fn run(&mut self, max_iterations: Option<u64>) -> Result<HarvestStats> {
        self.run_until(max_iterations, std::future::pending::<()>())
            .await
    }

    /// Like [`Harvester::run`], but stops when `shutdown` resolves
    ///
    /// Shutdown is only observed while pausing between iterations; an
    /// in-flight fetch or store command always completes.
    ///
    /// # Errors
    /// Returns the first fatal error
    pub async fn run_until<F>(
        &mut self,
        max_iterations: Option<u64>,
        shutdown: F,
    ) -> Result<HarvestStats>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        tracing::info!(
            source = "random article",
            max_iterations = ?max_iterations,
            key_prefix = %self.key_prefix,
            "Harvest loop starting"
        );

        let limit_reached = |completed: u64| max_iterations.is_some_and(|max| completed >= max);

        let mut completed: u64 = 0;
        while !limit_reached(completed) {
            self.iterate().await?;
            completed += 1;

            // no pause after the final iteration of a bounded run
            if limit_reached(completed) {
                break;
            }

            tokio::select! {
                _ = self.pacer.pause() => {}
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested, stopping harvest loop");
                    break;
                }
            }
        }

        self.log_stats();
        Ok(self.stats.clone())
    }

    fn log_stats(&self) {
        let stats = &self.stats;
        tracing::info!(
            iterations = stats.iterations,
            created = stats.created,
            replaced = stats.replaced,
            rejected_language = stats.rejected_language,
            rejected_detection = stats.rejected_detection,
            skipped = stats.skipped_pages,
            stored = %format_bytes(stats.bytes_stored),
            acceptance = %format!("{:.1}%", stats.acceptance_rate() * 100.0),
            elapsed_secs = stats.elapsed_secs(),
            "Harvest progress"
        );
    }
}
