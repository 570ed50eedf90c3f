//! Keyed listing store
//!
//! Listings are stored once per URL with insert-or-ignore semantics: a URL
//! seen before keeps its original values and query label. The store does
//! not track when a listing was last seen or reconcile price changes.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │   PersistenceSink    │
//! └──────────────────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │  ListingRepository   │  (trait)
//! └──────────────────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │ SqliteListingRepo... │  table `anzeigen`
//! └──────────────────────┘
//! ```

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::models::Listing;
use crate::utils::error::StorageError;

/// Row of the keyed store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredListing {
    pub id: i64,
    pub url: String,
    pub price: Option<String>,
    pub mileage: Option<String>,
    /// Query the listing was first stored under
    pub label: Option<String>,
}

/// Counts from one insert-or-ignore batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertStats {
    pub inserted: usize,
    pub ignored: usize,
}

/// Storage backend for listings keyed by URL
pub trait ListingRepository: Send + Sync {
    /// Insert listings whose URL is not stored yet; leave existing rows untouched
    fn insert_or_ignore(&self, listings: &[Listing], label: &str)
        -> Result<UpsertStats, StorageError>;

    /// Number of stored listings
    fn count(&self) -> Result<usize, StorageError>;

    /// Stored row for a URL
    fn get_by_url(&self, url: &str) -> Result<Option<StoredListing>, StorageError>;

    /// Rows stored under a query label, in insertion order
    fn list_by_label(&self, label: &str) -> Result<Vec<StoredListing>, StorageError>;
}

/// SQLite implementation of [`ListingRepository`]
///
/// Uses `Mutex` to ensure thread-safety for the SQLite connection.
pub struct SqliteListingRepository {
    conn: Mutex<Connection>,
}

impl SqliteListingRepository {
    /// Open (or create) the database at `path`
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
            }
        }

        let conn = Connection::open(path)?;

        // WAL lets concurrent crawls write to the same file
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let repo = Self {
            conn: Mutex::new(conn),
        };
        repo.create_schema()?;

        tracing::info!(path = %path.display(), "SQLite repository initialized");
        Ok(repo)
    }

    /// Create in-memory repository (for testing)
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let repo = Self {
            conn: Mutex::new(conn),
        };
        repo.create_schema()?;
        Ok(repo)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Create database schema
    fn create_schema(&self) -> Result<(), StorageError> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
                CREATE TABLE IF NOT EXISTS anzeigen (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    url TEXT UNIQUE,
                    preis TEXT,
                    kilometer TEXT,
                    modell TEXT
                );

                CREATE INDEX IF NOT EXISTS idx_anzeigen_modell
                    ON anzeigen(modell);
                "#,
        )?;

        Ok(())
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredListing> {
        Ok(StoredListing {
            id: row.get(0)?,
            url: row.get(1)?,
            price: row.get(2)?,
            mileage: row.get(3)?,
            label: row.get(4)?,
        })
    }
}

impl ListingRepository for SqliteListingRepository {
    fn insert_or_ignore(
        &self,
        listings: &[Listing],
        label: &str,
    ) -> Result<UpsertStats, StorageError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut stats = UpsertStats::default();

        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO anzeigen (url, preis, kilometer, modell)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;

            for listing in listings {
                let changed = stmt.execute(params![
                    listing.url,
                    listing.price,
                    listing.mileage,
                    label
                ])?;
                if changed == 0 {
                    stats.ignored += 1;
                } else {
                    stats.inserted += 1;
                }
            }
        }

        tx.commit()?;

        tracing::info!(
            label,
            inserted = stats.inserted,
            ignored = stats.ignored,
            "Stored listings"
        );
        Ok(stats)
    }

    fn count(&self) -> Result<usize, StorageError> {
        let conn = self.lock()?;
        let total: i64 = conn.query_row("SELECT COUNT(*) FROM anzeigen", [], |row| row.get(0))?;
        Ok(total as usize)
    }

    fn get_by_url(&self, url: &str) -> Result<Option<StoredListing>, StorageError> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT id, url, preis, kilometer, modell FROM anzeigen WHERE url = ?1",
                params![url],
                Self::map_row,
            )
            .optional()?;

        Ok(row)
    }

    fn list_by_label(&self, label: &str) -> Result<Vec<StoredListing>, StorageError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, url, preis, kilometer, modell FROM anzeigen
             WHERE modell = ?1 ORDER BY id",
        )?;

        let rows = stmt
            .query_map(params![label], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }
}
