//! Flat-file output: one CSV per normalized query
//!
//! Header `url,preis,kilometer`; absent fields are empty cells. Each crawl
//! rewrites its file completely.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::models::Listing;
use crate::utils::error::StorageError;
use crate::utils::sanitize_filename;

/// Column names of the CSV file
pub const CSV_HEADER: [&str; 3] = ["url", "preis", "kilometer"];

#[derive(Serialize)]
struct CsvRow<'a> {
    url: &'a str,
    preis: Option<&'a str>,
    kilometer: Option<&'a str>,
}

impl<'a> From<&'a Listing> for CsvRow<'a> {
    fn from(listing: &'a Listing) -> Self {
        Self {
            url: &listing.url,
            preis: listing.price.as_deref(),
            kilometer: listing.mileage.as_deref(),
        }
    }
}

/// Writes crawl results as CSV files into one directory
#[derive(Debug, Clone)]
pub struct CsvWriter {
    output_dir: PathBuf,
}

impl CsvWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// File a crawl for `query` is written to
    pub fn path_for(&self, query: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.csv", sanitize_filename(query)))
    }

    /// Write `listings` for `query`, replacing any earlier file
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the directory or file cannot be written
    pub fn write(&self, query: &str, listings: &[Listing]) -> Result<PathBuf, StorageError> {
        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| StorageError::io(&self.output_dir, e))?;

        let path = self.path_for(query);
        let file = std::fs::File::create(&path).map_err(|e| StorageError::io(&path, e))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        writer.write_record(CSV_HEADER)?;
        for listing in listings {
            writer.serialize(CsvRow::from(listing))?;
        }
        writer.flush().map_err(|e| StorageError::io(&path, e))?;

        tracing::info!(path = %path.display(), rows = listings.len(), "Wrote CSV file");
        Ok(path)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}
