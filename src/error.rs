//! Unified error handling for the firechair crate
//!
//! This module provides a unified error type that consolidates the
//! domain-specific errors into a single `Error` enum, while keeping the
//! domain errors available where a component needs them.
//!
//! Only validation and storage failures reach the top-level caller of a
//! crawl; per-page and per-listing failures are recorded in the report.
//! Setup can also fail on an unusable configuration or HTTP client.
//!
//! # Usage
//!
//! ```rust,ignore
//! use firechair::error::Error;
//!
//! fn report(err: &Error) {
//!     eprintln!("{}", err.localized_desc());
//! }
//! ```

use thiserror::Error;

use crate::i18n::t;

// Re-export domain-specific errors for convenience
pub use crate::utils::error::{
    CrawlStage, CrawlerError, FetchError, ParseError, StorageError, ValidationError,
};

/// Unified error type for the firechair crate
#[derive(Error, Debug)]
pub enum Error {
    /// Input rejected before any network activity
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Persistence step failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// HTTP client could not be built
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Stable translatable message followed by the raw cause
    pub fn localized_desc(&self) -> String {
        match self {
            Self::Validation(e) => match e {
                ValidationError::EmptyQuery => t!("errors.validation.empty_query").to_string(),
            },
            Self::Storage(e) => {
                let key = match e {
                    StorageError::Io { .. } => t!("errors.storage.io"),
                    StorageError::Csv(_) => t!("errors.storage.csv"),
                    StorageError::Database(_) => t!("errors.storage.database"),
                    StorageError::LockPoisoned => t!("errors.storage.lock"),
                };
                format!("{key}: {e}")
            }
            Self::Fetch(e) => format!("{}: {e}", t!("errors.fetch.failed")),
            Self::Config(msg) => format!("{}: {msg}", t!("errors.config.error")),
        }
    }

    /// Raw underlying cause text, without the translated prefix
    pub fn cause_text(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::Storage(e) => e.to_string(),
            Self::Fetch(e) => e.to_string(),
            Self::Config(msg) => msg.clone(),
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
