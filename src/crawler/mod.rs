//! Article retrieval
//!
//! [`ArticleSource`] is the seam the harvest loop fetches through;
//! [`fetcher::WikiFetcher`] is the HTTP implementation.

pub mod fetcher;

use async_trait::async_trait;

use crate::models::FetchedPage;
use crate::utils::error::FetchError;

pub use fetcher::WikiFetcher;

/// Something that can hand out one random article page per call
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Fetch the raw page of one random article
    async fn fetch_random(&self) -> Result<FetchedPage, FetchError>;
}
