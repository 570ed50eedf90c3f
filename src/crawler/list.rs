//! Listing page enumeration
//!
//! Fetches one result page and collects the detail-page URLs it links to.

use std::sync::Arc;

use crate::crawler::fetcher::ListingFetcher;
use crate::crawler::url::PageUrlBuilder;
use crate::crawler::StageOutcome;
use crate::parser::html::extract_listing_links;
use crate::parser::selectors::ListingLinkPolicy;
use crate::utils::error::{CrawlStage, CrawlerError};

/// Extracts detail-page URLs from result pages
pub struct ListingEnumerator {
    fetcher: Arc<ListingFetcher>,
    urls: Arc<PageUrlBuilder>,
    policy: ListingLinkPolicy,
}

impl ListingEnumerator {
    #[must_use]
    pub fn new(fetcher: Arc<ListingFetcher>, urls: Arc<PageUrlBuilder>) -> Self {
        Self::with_policy(fetcher, urls, ListingLinkPolicy::default())
    }

    #[must_use]
    pub fn with_policy(
        fetcher: Arc<ListingFetcher>,
        urls: Arc<PageUrlBuilder>,
        policy: ListingLinkPolicy,
    ) -> Self {
        Self {
            fetcher,
            urls,
            policy,
        }
    }

    /// Distinct absolute detail URLs on `page_url`, in document order
    ///
    /// A page that cannot be fetched yields no URLs and carries the failure;
    /// the rest of the crawl continues without it.
    pub async fn enumerate(&self, page_url: &str) -> StageOutcome<Vec<String>> {
        let html = match self.fetcher.fetch_html(page_url).await {
            Ok(html) => html,
            Err(e) => {
                let failure = CrawlerError::fetch(CrawlStage::Enumeration, page_url, e);
                tracing::warn!(url = %page_url, error = %failure, "Skipping result page");
                return StageOutcome::degraded(Vec::new(), failure);
            }
        };

        let links = extract_listing_links(&html, &self.policy, &self.urls);

        tracing::info!(url = %page_url, count = links.len(), "Listings found on page");
        StageOutcome::ok(links)
    }
}
