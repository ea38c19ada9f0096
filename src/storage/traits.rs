//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::record::DocumentRecord;
use crate::storage::StoreStats;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Every mutating call must be durable when it returns: a crash right after
/// `upsert_item` or `mark_page_completed` keeps exactly that unit of work.
pub trait Storage {
    // ===== Page Ledger =====

    /// Returns true if the page has a completion marker
    fn is_page_completed(&self, page_number: u32) -> StorageResult<bool>;

    /// Records that a page has been attempted
    ///
    /// Idempotent; marking an already-completed page only refreshes its timestamp.
    fn mark_page_completed(&mut self, page_number: u32) -> StorageResult<()>;

    /// Gets all completed page numbers in ascending order
    fn completed_pages(&self) -> StorageResult<Vec<u32>>;

    // ===== Documents =====

    /// Inserts or replaces the record stored under its URL
    ///
    /// All columns are written as one atomic row; readers never see a mix of
    /// old and new values.
    fn upsert_item(&mut self, record: &DocumentRecord) -> StorageResult<()>;

    /// Gets a document by URL
    fn get_item(&self, url: &str) -> StorageResult<Option<DocumentRecord>>;

    /// Gets all documents ordered by (page number, position, URL), NULL page numbers first
    fn all_items(&self) -> StorageResult<Vec<DocumentRecord>>;

    // ===== Statistics =====

    /// Counts documents and completed pages
    fn stats(&self) -> StorageResult<StoreStats>;
}
