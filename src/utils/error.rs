//! Error types for the firechair crawler
//!
//! This module defines the domain-specific error types used throughout the
//! crawl pipeline. The unified [`crate::error::Error`] wraps them.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during HTTP fetching operations
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status code
    #[error("Server responded with status {0}")]
    Status(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Classify a reqwest error, separating timeouts from other failures
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

/// Errors that can occur during HTML parsing operations
#[derive(Error, Debug)]
pub enum ParseError {
    /// CSS selector could not be compiled
    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Pipeline stage in which a per-page or per-listing failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlStage {
    Pagination,
    Enumeration,
    Extraction,
}

impl std::fmt::Display for CrawlStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pagination => write!(f, "pagination"),
            Self::Enumeration => write!(f, "enumeration"),
            Self::Extraction => write!(f, "extraction"),
        }
    }
}

/// Per-stage crawler errors
///
/// These are absorbed at the component that produced them and recorded in
/// the crawl report; they never abort a crawl.
#[derive(Error, Debug)]
pub enum CrawlerError {
    /// Fetch error
    #[error("Fetch error during {stage} of {url}: {source}")]
    Fetch {
        stage: CrawlStage,
        url: String,
        #[source]
        source: FetchError,
    },
}

impl CrawlerError {
    pub fn fetch(stage: CrawlStage, url: &str, source: FetchError) -> Self {
        Self::Fetch {
            stage,
            url: url.to_string(),
            source,
        }
    }

    /// Stage the failure happened in
    pub fn stage(&self) -> CrawlStage {
        match self {
            Self::Fetch { stage, .. } => *stage,
        }
    }

    /// URL that failed
    pub fn url(&self) -> &str {
        match self {
            Self::Fetch { url, .. } => url,
        }
    }

    /// Underlying cause without the stage/url prefix
    pub fn cause(&self) -> String {
        match self {
            Self::Fetch { source, .. } => source.to_string(),
        }
    }
}

/// Input rejected before any network activity
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Model/query string is empty after trimming
    #[error("Query must not be empty")]
    EmptyQuery,
}

/// Errors raised by the persistence targets
///
/// Storage failures are fatal for the persistence step of a crawl.
#[derive(Error, Debug)]
pub enum StorageError {
    /// File system error with the affected path
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// SQLite error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Connection mutex was poisoned by a panicking writer
    #[error("Database connection lock poisoned")]
    LockPoisoned,
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
