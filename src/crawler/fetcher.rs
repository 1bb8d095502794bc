//! HTTP fetcher for the random-article endpoint
//!
//! The endpoint answers with a redirect to a concrete article; the client
//! follows it and hands back the final URL together with the page markup.
//! Requests are not retried; the harvest loop's pause is the only backoff.

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE},
    Client,
};
use std::time::Duration;

use super::ArticleSource;
use crate::config::SourceConfig;
use crate::models::FetchedPage;
use crate::utils::error::FetchError;

/// Fetcher for Wikipedia's `Special:Random` endpoint
pub struct WikiFetcher {
    /// HTTP client with configured timeout, user agent and compression
    client: Client,

    /// Endpoint that redirects to a random article
    random_url: String,
}

impl WikiFetcher {
    /// Create a fetcher from the source configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if `random_url` does not parse and
    /// `FetchError::Http` if the HTTP client cannot be created
    pub fn new(config: &SourceConfig) -> Result<Self, FetchError> {
        Self::with_config(
            &config.random_url,
            &config.user_agent,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Create a fetcher with an explicit endpoint, user agent and timeout
    ///
    /// Tests point `random_url` at a mock server.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if `random_url` does not parse and
    /// `FetchError::Http` if the HTTP client cannot be created
    pub fn with_config(
        random_url: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        url::Url::parse(random_url).map_err(|e| FetchError::InvalidUrl(format!("{random_url}: {e}")))?;

        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(Self::build_headers())
            .timeout(timeout)
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            random_url: random_url.to_string(),
        })
    }

    /// The endpoint this fetcher requests
    pub fn random_url(&self) -> &str {
        &self.random_url
    }

    /// Fetch one random article page
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Timeout` or `FetchError::Http` when the request
    /// cannot complete, and `FetchError::ServerError` for a non-success status
    pub async fn fetch_random(&self) -> Result<FetchedPage, FetchError> {
        tracing::debug!(url = %self.random_url, "Requesting random article");

        let response = self
            .client
            .get(&self.random_url)
            .send()
            .await
            .map_err(Self::classify)?;

        let status = response.status();
        let url = response.url().to_string();

        if !status.is_success() {
            tracing::warn!(url = %url, status = %status, "Random article request failed");
            return Err(FetchError::ServerError(status.as_u16()));
        }

        let html = response.text().await.map_err(Self::classify)?;

        tracing::debug!(url = %url, bytes = html.len(), "Fetched article page");

        Ok(FetchedPage {
            url,
            status: status.as_u16(),
            html,
        })
    }

    fn classify(err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Http(err)
        }
    }

    fn build_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers
    }
}

#[async_trait]
impl ArticleSource for WikiFetcher {
    async fn fetch_random(&self) -> Result<FetchedPage, FetchError> {
        WikiFetcher::fetch_random(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_creation() {
        let fetcher = WikiFetcher::new(&SourceConfig::default());
        assert!(fetcher.is_ok());
        assert_eq!(
            fetcher.unwrap().random_url(),
            "https://en.wikipedia.org/wiki/Special:Random"
        );
    }

    #[test]
    fn test_invalid_url_rejected() {
        let fetcher = WikiFetcher::with_config("not a url", "test", Duration::from_secs(5));
        assert!(matches!(fetcher, Err(FetchError::InvalidUrl(_))));
    }

    #[test]
    fn test_default_headers() {
        let headers = WikiFetcher::build_headers();
        assert!(headers.contains_key(ACCEPT));
        assert_eq!(
            headers.get(ACCEPT_LANGUAGE).unwrap().to_str().unwrap(),
            "en-US,en;q=0.9"
        );
    }
}
