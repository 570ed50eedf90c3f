//! firechair - Motorcycle classifieds crawler
//!
//! Crawls Kleinanzeigen search results for a motorcycle model, extracts the
//! price and mileage of every listing, picks the cheapest and the
//! lowest-mileage offer, and writes the results to CSV and SQLite.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`crawler`] - Crawl stages, throttling and the orchestrating pipeline
//! - [`parser`] - HTML extraction policies and numeric normalization
//! - [`analytics`] - Cheapest / lowest-mileage selection
//! - [`models`] - Core data structures and progress events
//! - [`storage`] - CSV and SQLite persistence
//! - [`error`] - Unified error type
//! - [`i18n`] - Message localization
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use firechair::config::Config;
//! use firechair::crawler::CrawlPipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let pipeline = CrawlPipeline::new(&config)?;
//!     let report = pipeline.run("honda cbr 600f").await?;
//!     if let Some(summary) = report.result.summary() {
//!         println!("cheapest: {}", summary.cheapest.url);
//!     }
//!     Ok(())
//! }
//! ```

// Initialize rust-i18n at crate root level
rust_i18n::i18n!("locales", fallback = "en");

pub mod analytics;
pub mod config;
pub mod crawler;
pub mod error;
pub mod i18n;
pub mod models;
pub mod parser;
pub mod storage;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::analytics::Aggregator;
    pub use crate::config::Config;
    pub use crate::crawler::CrawlPipeline;
    pub use crate::error::{Error, Result};
    pub use crate::models::{CrawlEvent, CrawlReport, CrawlResult, Listing, ListingFields};
    pub use crate::parser::NumericKey;
    pub use crate::storage::{CsvWriter, ListingRepository, PersistenceSink, SqliteListingRepository};
}

// Direct re-exports for convenience
pub use models::{CrawlEvent, CrawlReport, CrawlResult, Listing};
