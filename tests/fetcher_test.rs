//! Integration tests for WikiFetcher using wiremock
//!
//! These tests validate the random-article fetcher against a mock server.

mod common;

use std::time::Duration;
use wikiharvest::crawler::WikiFetcher;
use wikiharvest::utils::error::FetchError;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher_for(server: &MockServer) -> WikiFetcher {
    WikiFetcher::with_config(
        &format!("{}/wiki/Special:Random", server.uri()),
        "wikiharvest-test/0.1",
        Duration::from_secs(5),
    )
    .unwrap()
}

/// Test that the redirect to a concrete article is followed
#[tokio::test]
async fn test_fetch_follows_redirect() {
    let mock_server = MockServer::start().await;
    let html = common::article_html("Test Article", "<p>History of testing.</p>");

    Mock::given(method("GET"))
        .and(path("/wiki/Special:Random"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/wiki/Test_Article"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/wiki/Test_Article"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(&mock_server)
        .await;

    let page = fetcher_for(&mock_server).fetch_random().await.unwrap();

    assert_eq!(page.status, 200);
    assert!(page.url.ends_with("/wiki/Test_Article"));
    assert!(page.html.contains("History of testing."));
}

/// Test that the configured user agent is sent
#[tokio::test]
async fn test_fetch_sends_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wiki/Special:Random"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = fetcher_for(&mock_server).fetch_random().await;
    assert!(result.is_ok(), "Fetch should succeed: {:?}", result.err());
}

/// Test that a server error is reported once, without retrying
#[tokio::test]
async fn test_server_error_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wiki/Special:Random"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = fetcher_for(&mock_server).fetch_random().await;
    assert!(matches!(result, Err(FetchError::ServerError(503))));
}

/// Test that a slow response surfaces as a timeout
#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wiki/Special:Random"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let fetcher = WikiFetcher::with_config(
        &format!("{}/wiki/Special:Random", mock_server.uri()),
        "wikiharvest-test/0.1",
        Duration::from_millis(200),
    )
    .unwrap();

    let result = fetcher.fetch_random().await;
    assert!(matches!(result, Err(FetchError::Timeout)), "got {result:?}");
}

/// Test that an unreachable host is a connection error
#[tokio::test]
async fn test_connection_refused() {
    let fetcher = WikiFetcher::with_config(
        "http://127.0.0.1:1/wiki/Special:Random",
        "wikiharvest-test/0.1",
        Duration::from_secs(2),
    )
    .unwrap();

    let result = fetcher.fetch_random().await;
    assert!(matches!(result, Err(FetchError::Http(_))), "got {result:?}");
}
