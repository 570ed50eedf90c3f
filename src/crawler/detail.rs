//! Detail page extraction
//!
//! Request spacing is not handled here; the pipeline waits on the shared
//! [`crate::crawler::Throttle`] before every call.

use std::sync::Arc;

use crate::crawler::fetcher::ListingFetcher;
use crate::crawler::StageOutcome;
use crate::models::ListingFields;
use crate::parser::html::extract_fields;
use crate::parser::selectors::DetailPolicy;
use crate::utils::error::{CrawlStage, CrawlerError};

/// Extracts price and mileage from detail pages
pub struct DetailExtractor {
    fetcher: Arc<ListingFetcher>,
    policy: DetailPolicy,
}

impl DetailExtractor {
    #[must_use]
    pub fn new(fetcher: Arc<ListingFetcher>) -> Self {
        Self::with_policy(fetcher, DetailPolicy::default())
    }

    #[must_use]
    pub fn with_policy(fetcher: Arc<ListingFetcher>, policy: DetailPolicy) -> Self {
        Self { fetcher, policy }
    }

    /// Price and mileage text of the listing at `detail_url`
    ///
    /// Missing elements leave the field `None`. A page that cannot be
    /// fetched yields both fields `None` and carries the failure.
    pub async fn extract(&self, detail_url: &str) -> StageOutcome<ListingFields> {
        let html = match self.fetcher.fetch_html(detail_url).await {
            Ok(html) => html,
            Err(e) => {
                let failure = CrawlerError::fetch(CrawlStage::Extraction, detail_url, e);
                tracing::warn!(url = %detail_url, error = %failure, "Listing details unavailable");
                return StageOutcome::degraded(ListingFields::default(), failure);
            }
        };

        let fields = extract_fields(&html, &self.policy);

        tracing::debug!(
            url = %detail_url,
            price = ?fields.price,
            mileage = ?fields.mileage,
            "Extracted listing"
        );
        StageOutcome::ok(fields)
    }
}
