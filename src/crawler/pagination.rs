//! Pagination discovery
//!
//! Reads the pagination controls of the first result page to learn how many
//! pages a query has. Fails open: any problem yields a single page.

use std::sync::Arc;

use crate::crawler::fetcher::ListingFetcher;
use crate::crawler::url::PageUrlBuilder;
use crate::crawler::StageOutcome;
use crate::parser::html::parse_max_page;
use crate::parser::selectors::PaginationPolicy;
use crate::utils::error::{CrawlStage, CrawlerError};

/// Discovers the number of result pages for a query
pub struct PaginationDiscoverer {
    fetcher: Arc<ListingFetcher>,
    urls: Arc<PageUrlBuilder>,
    policy: PaginationPolicy,
}

impl PaginationDiscoverer {
    #[must_use]
    pub fn new(fetcher: Arc<ListingFetcher>, urls: Arc<PageUrlBuilder>) -> Self {
        Self::with_policy(fetcher, urls, PaginationPolicy::default())
    }

    #[must_use]
    pub fn with_policy(
        fetcher: Arc<ListingFetcher>,
        urls: Arc<PageUrlBuilder>,
        policy: PaginationPolicy,
    ) -> Self {
        Self {
            fetcher,
            urls,
            policy,
        }
    }

    /// Highest page number offered for `query` (at least 1)
    ///
    /// Returns 1 when the page has no pagination controls. When the first
    /// page cannot be fetched the value is 1 and the failure is attached.
    pub async fn discover_max_page(&self, query: &str) -> StageOutcome<u32> {
        let url = self.urls.build(query, 1);

        let html = match self.fetcher.fetch_html(&url).await {
            Ok(html) => html,
            Err(e) => {
                let failure = CrawlerError::fetch(CrawlStage::Pagination, &url, e);
                tracing::warn!(url = %url, error = %failure, "Page count unavailable, assuming 1");
                return StageOutcome::degraded(1, failure);
            }
        };

        let max_page = parse_max_page(&html, &self.policy).unwrap_or(1).max(1);

        tracing::info!(query, max_page, "Detected page count");
        StageOutcome::ok(max_page)
    }
}
