//! Storage module for persisting harvested documents
//!
//! This module handles all database operations for the harvester, including:
//! - SQLite database initialization and additive schema migration
//! - Document upserts keyed by URL
//! - The page completion ledger that makes runs resumable
//! - Ordered reads for export and summary statistics

mod schema;
mod sqlite;
mod traits;

pub use schema::DOCUMENT_COLUMNS;
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::ArchiveError;
use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(ArchiveError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, ArchiveError> {
    SqliteStorage::new(path)
}

/// Counts reported by `Storage::stats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub item_count: u64,
    pub completed_page_count: u64,
}
