//! Crawl orchestration
//!
//! Runs the stages for one model query in order and reports progress as
//! [`CrawlEvent`]s.
//!
//! # Architecture
//!
//! ```text
//! model ──▶ normalize_query ──▶ PaginationDiscoverer ──▶ ListingEnumerator
//!                                                              │ (page 1..=N)
//!                                                              ▼
//!  PersistenceSink ◀── Aggregator ◀── DetailExtractor ◀── Throttle
//! ```
//!
//! Pages and listings are processed one after another. Stage failures are
//! recorded in the report and never abort the crawl; only an invalid query
//! or a persistence failure ends it with an error.
//!
//! # Example
//!
//! ```no_run
//! use firechair::config::Config;
//! use firechair::crawler::CrawlPipeline;
//!
//! # async fn example() -> firechair::error::Result<()> {
//! let mut pipeline = CrawlPipeline::new(&Config::default())?;
//! let mut events = pipeline.subscribe();
//!
//! tokio::spawn(async move {
//!     while let Some(event) = events.recv().await {
//!         println!("{event:?}");
//!     }
//! });
//!
//! let report = pipeline.run("honda cbr 600f").await?;
//! println!("{} listings", report.result.len());
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;

use crate::analytics::Aggregator;
use crate::config::Config;
use crate::crawler::{
    DetailExtractor, ListingEnumerator, ListingFetcher, PageUrlBuilder, PaginationDiscoverer,
    Throttle,
};
use crate::error::{Error, Result};
use crate::i18n::t;
use crate::models::{CrawlEvent, CrawlReport, FailureRecord, Listing};
use crate::storage::PersistenceSink;
use crate::utils::error::CrawlerError;
use crate::utils::normalize_query;

/// Drives one crawl from model text to persisted result
pub struct CrawlPipeline {
    urls: Arc<PageUrlBuilder>,
    pagination: PaginationDiscoverer,
    enumerator: ListingEnumerator,
    extractor: DetailExtractor,
    throttle: Throttle,
    sink: PersistenceSink,
    events: Option<mpsc::UnboundedSender<CrawlEvent>>,
}

impl CrawlPipeline {
    /// Build a pipeline with the persistence targets enabled in `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the HTTP client
    /// cannot be built or the database cannot be opened
    pub fn new(config: &Config) -> Result<Self> {
        let sink = PersistenceSink::from_config(&config.storage)?;
        Self::with_sink(config, sink)
    }

    /// Build a pipeline that persists through `sink`
    pub fn with_sink(config: &Config, sink: PersistenceSink) -> Result<Self> {
        let fetcher = Arc::new(ListingFetcher::new(&config.crawler)?);
        let urls = Arc::new(
            PageUrlBuilder::from_config(&config.crawler)
                .map_err(|e| Error::config(e.to_string()))?,
        );
        let throttle = Throttle::new(config.request_delay())?;

        tracing::debug!(
            base_url = %config.crawler.base_url,
            category = %config.crawler.category,
            delay_ms = config.crawler.request_delay_ms,
            "Crawl pipeline ready"
        );

        Ok(Self {
            pagination: PaginationDiscoverer::new(Arc::clone(&fetcher), Arc::clone(&urls)),
            enumerator: ListingEnumerator::new(Arc::clone(&fetcher), Arc::clone(&urls)),
            extractor: DetailExtractor::new(fetcher),
            urls,
            throttle,
            sink,
            events: None,
        })
    }

    /// Send progress events to `tx`
    #[must_use]
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<CrawlEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    /// Open a new event channel, replacing any earlier subscriber
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<CrawlEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    pub fn sink(&self) -> &PersistenceSink {
        &self.sink
    }

    fn emit(&self, event: CrawlEvent) {
        if let Some(tx) = &self.events {
            // A closed receiver only means nobody is listening
            let _ = tx.send(event);
        }
    }

    fn fail(&self, err: Error) -> Error {
        self.emit(CrawlEvent::Failed {
            message: err.localized_desc(),
            cause: err.cause_text(),
        });
        err
    }

    /// Crawl all result pages for `model` and persist the listings
    ///
    /// # Errors
    ///
    /// - `Error::Validation` if `model` is blank; nothing is fetched
    /// - `Error::Storage` if the result cannot be written
    pub async fn run(&self, model: &str) -> Result<CrawlReport> {
        let started_at = Utc::now();
        let model = model.trim().to_string();

        let query = normalize_query(&model).map_err(|e| self.fail(e.into()))?;

        tracing::info!(model = %model, query = %query, "Starting crawl");
        self.emit(CrawlEvent::Started {
            model: model.clone(),
            query: query.clone(),
        });

        let mut failures: Vec<FailureRecord> = Vec::new();
        let mut record = |failure: Option<CrawlerError>| {
            if let Some(err) = failure {
                failures.push(FailureRecord::from(&err));
            }
        };

        let (max_page, failure) = self.pagination.discover_max_page(&query).await.into_parts();
        record(failure);
        self.emit(CrawlEvent::PagesDiscovered { max_page });

        let mut seen = HashSet::new();
        let mut detail_urls = Vec::new();
        for page in 1..=max_page {
            let page_url = self.urls.build(&query, page);
            let (links, failure) = self.enumerator.enumerate(&page_url).await.into_parts();
            record(failure);

            for link in links {
                if seen.insert(link.clone()) {
                    detail_urls.push(link);
                }
            }
        }

        let total = detail_urls.len();
        tracing::info!(query = %query, pages = max_page, total, "Listings discovered");
        self.emit(CrawlEvent::TotalKnown { total });

        let mut listings = Vec::with_capacity(total);
        for (index, url) in detail_urls.into_iter().enumerate() {
            self.throttle.wait().await;

            let (fields, failure) = self.extractor.extract(&url).await.into_parts();
            record(failure);

            self.emit(CrawlEvent::ListingProcessed {
                completed: index + 1,
                total,
                url: url.clone(),
            });
            listings.push(Listing::new(url, fields));
        }

        let result = Aggregator::aggregate(listings);

        let persisted = self
            .sink
            .persist(&result, &query, &query)
            .map_err(|e| self.fail(e.into()))?;

        let message = if result.is_empty() {
            t!("crawl.no_data").to_string()
        } else {
            t!("crawl.finished", count = result.len()).to_string()
        };

        if failures.is_empty() {
            tracing::info!(query = %query, listings = result.len(), "Crawl finished");
        } else {
            tracing::warn!(
                query = %query,
                listings = result.len(),
                failures = failures.len(),
                "Crawl finished with failures"
            );
        }

        self.emit(CrawlEvent::Finished {
            listings: result.len(),
            message,
        });

        Ok(CrawlReport {
            model,
            query,
            pages: max_page,
            result,
            failures,
            persisted,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PersistOutcome;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.crawler.base_url = String::from("http://127.0.0.1:9");
        config.crawler.request_delay_ms = 1;
        config.crawler.request_timeout_secs = 1;
        config
    }

    #[tokio::test]
    async fn test_blank_model_rejected_before_fetching() {
        let mut pipeline = CrawlPipeline::with_sink(&test_config(), PersistenceSink::new()).unwrap();
        let mut events = pipeline.subscribe();

        let err = pipeline.run("   ").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        match events.recv().await {
            Some(CrawlEvent::Failed { cause, .. }) => {
                assert_eq!(cause, "Query must not be empty")
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_site_yields_empty_report() {
        let mut pipeline = CrawlPipeline::with_sink(&test_config(), PersistenceSink::new()).unwrap();
        let mut events = pipeline.subscribe();

        let report = pipeline.run("honda cbr").await.unwrap();
        assert_eq!(report.query, "honda-cbr");
        assert_eq!(report.pages, 1);
        assert!(report.result.is_empty());
        assert!(report.is_partial());
        assert_eq!(report.persisted, PersistOutcome::default());

        drop(pipeline);
        let mut seen = Vec::new();
        while let Some(event) = events.recv().await {
            seen.push(event);
        }
        assert!(matches!(seen.first(), Some(CrawlEvent::Started { .. })));
        assert!(matches!(
            seen.last(),
            Some(CrawlEvent::Finished { listings: 0, .. })
        ));
    }

    #[test]
    fn test_zero_delay_rejected() {
        let mut config = test_config();
        config.crawler.request_delay_ms = 0;
        assert!(CrawlPipeline::with_sink(&config, PersistenceSink::new()).is_err());
    }
}
