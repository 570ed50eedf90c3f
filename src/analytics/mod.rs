//! Aggregation of crawled listings into summary statistics
//!
//! The aggregator picks the cheapest listing and the one with the lowest
//! mileage. Comparison runs over [`crate::parser::normalize`], so listings
//! whose field is missing or garbled sort last, and ties go to the listing
//! encountered first.

use crate::models::{CrawlResult, Listing};
use crate::parser::normalize::NumericKey;

/// Builds a [`CrawlResult`] from the listings of one crawl
pub struct Aggregator;

impl Aggregator {
    /// Aggregate listings in encounter order
    ///
    /// An empty input produces an empty result without summary picks.
    pub fn aggregate(listings: Vec<Listing>) -> CrawlResult {
        let cheapest = stable_argmin(&listings, Listing::price_key).cloned();
        let lowest_mileage = stable_argmin(&listings, Listing::mileage_key).cloned();

        let priced_count = listings.iter().filter(|l| l.price_key().is_finite()).count();
        let mileage_count = listings
            .iter()
            .filter(|l| l.mileage_key().is_finite())
            .count();

        tracing::debug!(
            listings = listings.len(),
            priced_count,
            mileage_count,
            "Aggregated crawl result"
        );

        CrawlResult::new(
            listings,
            cheapest,
            lowest_mileage,
            priced_count,
            mileage_count,
        )
    }
}

/// First listing with the minimal key
fn stable_argmin<F>(listings: &[Listing], key: F) -> Option<&Listing>
where
    F: Fn(&Listing) -> NumericKey,
{
    // min_by_key returns the first of several equal minima
    listings.iter().min_by_key(|listing| key(listing))
}
