//! HTTP fetcher for listing and detail pages
//!
//! Plain GET requests with a fixed User-Agent and browser-like accept
//! headers. No cookies, no authentication and no retry: a failed request
//! is a terminal failure for that call and the calling stage decides how to
//! degrade.

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE},
    Client,
};
use std::time::Duration;

use crate::config::CrawlerConfig;
use crate::utils::error::FetchError;

/// Fetches HTML pages from the target site
pub struct ListingFetcher {
    /// HTTP client with configured timeout and User-Agent
    client: Client,
}

impl ListingFetcher {
    /// Create a fetcher from crawler configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new(config: &CrawlerConfig) -> Result<Self, FetchError> {
        Self::with_config(
            &config.user_agent,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Create a fetcher with an explicit User-Agent and timeout
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn with_config(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(Self::build_headers())
            .timeout(timeout)
            .gzip(true)
            .build()?;

        Ok(Self { client })
    }

    /// Fetch a page and return its body as text
    ///
    /// # Errors
    ///
    /// - `FetchError::InvalidUrl` if `url` cannot be parsed
    /// - `FetchError::Timeout` if the request timed out
    /// - `FetchError::Status` for any non-success status code
    /// - `FetchError::Http` for other transport or body errors
    pub async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let parsed =
            reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;

        tracing::debug!(url = %parsed, "Fetching page");

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(FetchError::from_reqwest)?;

        tracing::trace!(url, bytes = body.len(), "Fetched page");
        Ok(body)
    }

    /// Browser-like headers sent with every request
    fn build_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("de-DE,de;q=0.9,en;q=0.8"),
        );

        headers
    }
}
