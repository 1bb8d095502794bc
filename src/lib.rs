//! wikiharvest - Random Wikipedia article harvester
//!
//! Continuously pulls random encyclopedia articles, keeps the English ones,
//! strips citation markers and stores the text in Redis as language-model
//! training data.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration from environment, `.env` and TOML
//! - [`crawler`] - Random-article fetching
//! - [`parser`] - Title/body extraction and citation removal
//! - [`language`] - Language detection and the English-only gate
//! - [`storage`] - Key-value store adapters and the overwrite policy
//! - [`throttle`] - Randomized pause between requests
//! - [`harvester`] - The sequential fetch → store loop
//! - [`models`] - Core data structures and types
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use wikiharvest::prelude::*;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let store = RedisStore::connect(&config.store).await?;
//!     let mut harvester = Harvester::new(
//!         WikiFetcher::new(&config.source)?,
//!         LanguageGate::from_config(WhatlangDetector::new(), &config.language),
//!         store,
//!         JitterPacer::from_config(&config.throttle),
//!         config.store.key_prefix.clone(),
//!     );
//!     harvester.run(None).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crawler;
pub mod error;
pub mod harvester;
pub mod language;
pub mod models;
pub mod parser;
pub mod storage;
pub mod throttle;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::crawler::{ArticleSource, WikiFetcher};
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::harvester::Harvester;
    pub use crate::language::{LanguageDetector, LanguageGate, WhatlangDetector};
    pub use crate::models::{Article, HarvestStats, IterationOutcome};
    pub use crate::storage::{ArticleStore, MemoryStore, RedisStore};
    pub use crate::throttle::{JitterPacer, Pacer};
}

// Direct re-exports for convenience
pub use models::{Article, HarvestStats, IterationOutcome};
