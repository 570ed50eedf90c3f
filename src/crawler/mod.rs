//! Crawl-and-extract pipeline
//!
//! This module implements the crawl stages for Kleinanzeigen result pages:
//! pagination discovery, listing enumeration and detail extraction, plus the
//! [`pipeline::CrawlPipeline`] that drives them in order.
//!
//! Each stage returns a [`StageOutcome`]: the value to continue with (a safe
//! default when the stage failed) together with the failure, if any. Stage
//! failures are never raised as errors.

pub mod detail;
pub mod fetcher;
pub mod list;
pub mod pagination;
pub mod pipeline;
pub mod url;

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::utils::error::CrawlerError;

pub use detail::DetailExtractor;
pub use fetcher::ListingFetcher;
pub use list::ListingEnumerator;
pub use pagination::PaginationDiscoverer;
pub use pipeline::CrawlPipeline;
pub use url::PageUrlBuilder;

/// Result of one crawl stage
///
/// `value` is always usable. When the stage failed it holds the stage's
/// documented default and `failure` says why.
#[derive(Debug)]
pub struct StageOutcome<T> {
    pub value: T,
    pub failure: Option<CrawlerError>,
}

impl<T> StageOutcome<T> {
    pub fn ok(value: T) -> Self {
        Self {
            value,
            failure: None,
        }
    }

    pub fn degraded(fallback: T, failure: CrawlerError) -> Self {
        Self {
            value: fallback,
            failure: Some(failure),
        }
    }

    /// Whether the value is a fallback
    pub fn is_degraded(&self) -> bool {
        self.failure.is_some()
    }

    pub fn into_parts(self) -> (T, Option<CrawlerError>) {
        (self.value, self.failure)
    }
}

/// Minimum delay before every detail-page request
///
/// Backed by a single-cell governor quota. [`Throttle::wait`] first takes
/// any cell that has built up while idle, so even the first call waits a
/// full `period`, and two calls never return less than `period` apart.
pub struct Throttle {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    period: Duration,
}

impl Throttle {
    /// Create a throttle with the given minimum spacing
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `period` is zero
    pub fn new(period: Duration) -> Result<Self> {
        let quota = Quota::with_period(period)
            .ok_or_else(|| Error::config("request delay must be greater than zero"))?;

        Ok(Self {
            limiter: RateLimiter::direct(quota),
            period,
        })
    }

    /// Wait until the next request may be sent
    pub async fn wait(&self) {
        // A cell available now would let the request through without delay
        let _ = self.limiter.check();
        self.limiter.until_ready().await;
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}
