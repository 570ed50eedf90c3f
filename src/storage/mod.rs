//! Persistence of crawl results
//!
//! A crawl is written to up to two targets:
//!
//! - [`csv::CsvWriter`]: one flat file per query, rewritten every crawl
//! - [`repository::ListingRepository`]: a keyed store that keeps the first
//!   record for every URL across crawls
//!
//! [`PersistenceSink`] combines both. A failure in either target aborts the
//! persistence step and is surfaced to the caller.

pub mod csv;
pub mod repository;

use crate::config::StorageConfig;
use crate::models::{CrawlResult, PersistOutcome};
use crate::utils::error::StorageError;

pub use self::csv::CsvWriter;
pub use repository::{ListingRepository, SqliteListingRepository, StoredListing, UpsertStats};

/// Writes crawl results to the configured targets
#[derive(Default)]
pub struct PersistenceSink {
    csv: Option<CsvWriter>,
    repository: Option<Box<dyn ListingRepository>>,
}

impl PersistenceSink {
    /// Sink with no targets; add them with the builder methods
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the targets enabled in `config`
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the SQLite database cannot be opened
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let mut sink = Self::new();

        if config.write_csv {
            sink = sink.with_csv(CsvWriter::new(&config.output_dir));
        }

        if config.write_database {
            let repo = SqliteListingRepository::new(&config.sqlite_path)?;
            sink = sink.with_repository(Box::new(repo));
        }

        Ok(sink)
    }

    #[must_use]
    pub fn with_csv(mut self, writer: CsvWriter) -> Self {
        self.csv = Some(writer);
        self
    }

    #[must_use]
    pub fn with_repository(mut self, repository: Box<dyn ListingRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn repository(&self) -> Option<&dyn ListingRepository> {
        self.repository.as_deref()
    }

    /// Write `result` for `query`, tagging stored rows with `label`
    ///
    /// The CSV file is written first, then the keyed store. An empty result
    /// still rewrites the CSV file with only its header.
    ///
    /// # Errors
    ///
    /// Returns the first `StorageError` raised by a target
    pub fn persist(
        &self,
        result: &CrawlResult,
        query: &str,
        label: &str,
    ) -> Result<PersistOutcome, StorageError> {
        let mut outcome = PersistOutcome::default();

        if let Some(writer) = &self.csv {
            outcome.csv_path = Some(writer.write(query, result.listings())?);
        }

        if let Some(repo) = &self.repository {
            let stats = repo.insert_or_ignore(result.listings(), label)?;
            outcome.inserted = stats.inserted;
            outcome.ignored = stats.ignored;
        }

        Ok(outcome)
    }
}
