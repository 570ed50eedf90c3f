//! Integration tests for ListingFetcher using wiremock
//!
//! These tests validate the HTTP fetcher's behavior with mock servers.

use firechair::crawler::fetcher::ListingFetcher;
use firechair::utils::error::FetchError;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> ListingFetcher {
    ListingFetcher::with_config("Mozilla/5.0", Duration::from_secs(5)).unwrap()
}

/// Test successful fetch from mock server
#[tokio::test]
async fn test_fetch_success() {
    let mock_server = MockServer::start().await;
    let html = r#"<!DOCTYPE html>
<html>
<head><title>Honda CBR 600F</title></head>
<body><h2 id="viewad-price">3.200 €</h2></body>
</html>"#;

    Mock::given(method("GET"))
        .and(path("/s-anzeige/honda/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(&mock_server)
        .await;

    let url = format!("{}/s-anzeige/honda/1", mock_server.uri());
    let result = fetcher().fetch_html(&url).await;

    assert!(result.is_ok(), "Fetch should succeed: {:?}", result.err());
    assert!(result.unwrap().contains("3.200 €"));
}

/// Test that the configured User-Agent is sent
#[tokio::test]
async fn test_user_agent_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("user-agent", "Mozilla/5.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = fetcher().fetch_html(&mock_server.uri()).await;
    assert_eq!(result.unwrap(), "OK");
}

/// Test server errors are reported without retrying
#[tokio::test]
async fn test_server_error_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/broken", mock_server.uri());
    let err = fetcher().fetch_html(&url).await.unwrap_err();

    assert!(matches!(err, FetchError::Status(500)));
}

/// Test 404 is a status failure
#[tokio::test]
async fn test_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s-anzeige/gone/1"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/s-anzeige/gone/1", mock_server.uri());
    let err = fetcher().fetch_html(&url).await.unwrap_err();

    assert!(matches!(err, FetchError::Status(404)));
}

/// Test slow responses hit the timeout
#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let fetcher = ListingFetcher::with_config("Mozilla/5.0", Duration::from_millis(200)).unwrap();
    let err = fetcher.fetch_html(&mock_server.uri()).await.unwrap_err();

    assert!(matches!(err, FetchError::Timeout));
}

#[tokio::test]
async fn test_invalid_url() {
    let err = fetcher().fetch_html("not a url").await.unwrap_err();
    assert!(matches!(err, FetchError::InvalidUrl(_)));
}
