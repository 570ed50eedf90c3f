// Core data structures for the firechair crawler

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::parser::normalize::{normalize, NumericKey};
use crate::utils::error::{CrawlStage, CrawlerError};

/// Fields extracted from one detail page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingFields {
    pub price: Option<String>,
    pub mileage: Option<String>,
}

/// One classified ad
///
/// Both fields may be absent: "found but unparsable" is still a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Canonical absolute URL of the detail page
    pub url: String,

    /// Raw price text, formatting preserved
    pub price: Option<String>,

    /// Raw mileage text, formatting preserved
    pub mileage: Option<String>,
}

impl Listing {
    pub fn new(url: impl Into<String>, fields: ListingFields) -> Self {
        Self {
            url: url.into(),
            price: fields.price,
            mileage: fields.mileage,
        }
    }

    /// Comparison key for the price
    pub fn price_key(&self) -> NumericKey {
        normalize(self.price.as_deref())
    }

    /// Comparison key for the mileage
    pub fn mileage_key(&self) -> NumericKey {
        normalize(self.mileage.as_deref())
    }

    /// Whether neither field could be extracted
    pub fn is_bare(&self) -> bool {
        self.price.is_none() && self.mileage.is_none()
    }
}

/// Ordered listings of one crawl plus derived summary fields
///
/// Built by [`crate::analytics::Aggregator`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct CrawlResult {
    listings: Vec<Listing>,
    cheapest: Option<Listing>,
    lowest_mileage: Option<Listing>,
    priced_count: usize,
    mileage_count: usize,
}

/// Summary picks of a non-empty crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary<'a> {
    pub cheapest: &'a Listing,
    pub lowest_mileage: &'a Listing,
}

impl CrawlResult {
    pub(crate) fn new(
        listings: Vec<Listing>,
        cheapest: Option<Listing>,
        lowest_mileage: Option<Listing>,
        priced_count: usize,
        mileage_count: usize,
    ) -> Self {
        Self {
            listings,
            cheapest,
            lowest_mileage,
            priced_count,
            mileage_count,
        }
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// No listing was found in the whole crawl
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn cheapest(&self) -> Option<&Listing> {
        self.cheapest.as_ref()
    }

    pub fn lowest_mileage(&self) -> Option<&Listing> {
        self.lowest_mileage.as_ref()
    }

    /// Both summary picks, or `None` for an empty crawl
    pub fn summary(&self) -> Option<Summary<'_>> {
        match (&self.cheapest, &self.lowest_mileage) {
            (Some(cheapest), Some(lowest_mileage)) => Some(Summary {
                cheapest,
                lowest_mileage,
            }),
            _ => None,
        }
    }

    /// Listings with a parsable price
    pub fn priced_count(&self) -> usize {
        self.priced_count
    }

    /// Listings with a parsable mileage
    pub fn mileage_count(&self) -> usize {
        self.mileage_count
    }

    pub fn into_listings(self) -> Vec<Listing> {
        self.listings
    }
}

/// A page or listing that could not be processed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub stage: CrawlStage,
    pub url: String,
    pub cause: String,
}

impl From<&CrawlerError> for FailureRecord {
    fn from(err: &CrawlerError) -> Self {
        Self {
            stage: err.stage(),
            url: err.url().to_string(),
            cause: err.cause(),
        }
    }
}

/// What the persistence step wrote
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistOutcome {
    /// CSV file written, when the CSV target is enabled
    pub csv_path: Option<PathBuf>,

    /// Rows newly inserted into the keyed store
    pub inserted: usize,

    /// Rows skipped because their URL was already stored
    pub ignored: usize,
}

/// Everything one crawl produced
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    /// Model text as entered, trimmed
    pub model: String,

    /// Normalized query used in URLs, file name and store label
    pub query: String,

    /// Number of result pages crawled
    pub pages: u32,

    pub result: CrawlResult,

    /// Pages and listings that failed and were skipped or left blank
    pub failures: Vec<FailureRecord>,

    pub persisted: PersistOutcome,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    /// Whether any page or listing failed
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Progress event emitted by the crawl pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CrawlEvent {
    /// Input accepted, crawl begins
    Started { model: String, query: String },

    /// Number of result pages known
    PagesDiscovered { max_page: u32 },

    /// Total work units (listings) known
    TotalKnown { total: usize },

    /// One listing finished, successful or not
    ListingProcessed {
        completed: usize,
        total: usize,
        url: String,
    },

    /// Crawl and persistence succeeded
    Finished { listings: usize, message: String },

    /// Crawl aborted by a validation or storage failure
    Failed { message: String, cause: String },
}

impl CrawlEvent {
    /// Whether this event ends the crawl
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished { .. } | Self::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::FetchError;

    fn listing(url: &str, price: Option<&str>, mileage: Option<&str>) -> Listing {
        Listing::new(
            url,
            ListingFields {
                price: price.map(String::from),
                mileage: mileage.map(String::from),
            },
        )
    }

    #[test]
    fn test_listing_keys() {
        let l = listing("https://x/s-anzeige/1", Some("3.200 €"), None);
        assert_eq!(l.price_key(), NumericKey::Finite(3200));
        assert_eq!(l.mileage_key(), NumericKey::Infinite);
        assert!(!l.is_bare());
        assert!(listing("https://x/s-anzeige/2", None, None).is_bare());
    }

    #[test]
    fn test_empty_result_has_no_summary() {
        let result = CrawlResult::default();
        assert!(result.is_empty());
        assert!(result.summary().is_none());
        assert!(result.cheapest().is_none());
    }

    #[test]
    fn test_failure_record_from_error() {
        let err = CrawlerError::fetch(
            CrawlStage::Enumeration,
            "https://x/Seite:2/s-q/k0c305",
            FetchError::Status(500),
        );
        let record = FailureRecord::from(&err);
        assert_eq!(record.stage, CrawlStage::Enumeration);
        assert_eq!(record.url, "https://x/Seite:2/s-q/k0c305");
        assert_eq!(record.cause, "Server responded with status 500");
    }

    #[test]
    fn test_event_serialization() {
        let event = CrawlEvent::ListingProcessed {
            completed: 1,
            total: 3,
            url: "https://x/s-anzeige/1".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "listing_processed");
        assert_eq!(json["completed"], 1);
        assert!(!event.is_terminal());

        let done = CrawlEvent::Finished {
            listings: 0,
            message: "none".into(),
        };
        assert!(done.is_terminal());
    }
}
