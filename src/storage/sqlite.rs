//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::record::{DocumentFields, DocumentRecord};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::StoreStats;
use crate::ArchiveError;
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const SELECT_DOCUMENT: &str = "SELECT document_url, page_number, page_position,
    original_publication_date, title, credits, text_body, summary, authors,
    associated_places, subjects_discussed, associated_people_orgs, document_contributors,
    source, original_upload_date, original_archive_title, language, rights, record_id,
    original_classification, donors, scraped_at
    FROM documents";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(ArchiveError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, ArchiveError> {
        let conn = Connection::open(path)?;

        // Every statement runs in autocommit mode; FULL sync makes each one
        // durable before it returns.
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = FULL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, ArchiveError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn encode_list(values: &Option<Vec<String>>) -> StorageResult<Option<String>> {
    values
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| StorageError::Serialization(e.to_string()))
}

fn decode_list(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Vec<String>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| serde_json::from_str::<Vec<String>>(&s))
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn document_from_row(row: &Row<'_>) -> rusqlite::Result<DocumentRecord> {
    Ok(DocumentRecord {
        document_url: row.get(0)?,
        page_number: row.get(1)?,
        page_position: row.get(2)?,
        fields: DocumentFields {
            original_publication_date: row.get(3)?,
            title: row.get(4)?,
            credits: row.get(5)?,
            text_body: row.get(6)?,
            summary: row.get(7)?,
            authors: decode_list(row, 8)?,
            associated_places: decode_list(row, 9)?,
            subjects_discussed: decode_list(row, 10)?,
            associated_people_orgs: decode_list(row, 11)?,
            document_contributors: decode_list(row, 12)?,
            source: row.get(13)?,
            original_upload_date: row.get(14)?,
            original_archive_title: decode_list(row, 15)?,
            language: decode_list(row, 16)?,
            rights: row.get(17)?,
            record_id: row.get(18)?,
            original_classification: row.get(19)?,
            donors: decode_list(row, 20)?,
        },
        scraped_at: row.get::<_, Option<String>>(21)?.unwrap_or_default(),
    })
}

impl Storage for SqliteStorage {
    // ===== Page Ledger =====

    fn is_page_completed(&self, page_number: u32) -> StorageResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM completed_pages WHERE page_number = ?1",
                params![page_number],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn mark_page_completed(&mut self, page_number: u32) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT OR REPLACE INTO completed_pages (page_number, completed_at) VALUES (?1, ?2)",
            params![page_number, now],
        )?;
        Ok(())
    }

    fn completed_pages(&self) -> StorageResult<Vec<u32>> {
        let mut stmt = self
            .conn
            .prepare("SELECT page_number FROM completed_pages ORDER BY page_number ASC")?;

        let pages = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(pages)
    }

    // ===== Documents =====

    fn upsert_item(&mut self, record: &DocumentRecord) -> StorageResult<()> {
        let f = &record.fields;
        self.conn.execute(
            "INSERT OR REPLACE INTO documents (
                document_url, page_number, page_position, original_publication_date, title,
                credits, text_body, summary, authors, associated_places, subjects_discussed,
                associated_people_orgs, document_contributors, source, original_upload_date,
                original_archive_title, language, rights, record_id, original_classification,
                donors, scraped_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                      ?17, ?18, ?19, ?20, ?21, ?22)",
            params![
                record.document_url,
                record.page_number,
                record.page_position,
                f.original_publication_date,
                f.title,
                f.credits,
                f.text_body,
                f.summary,
                encode_list(&f.authors)?,
                encode_list(&f.associated_places)?,
                encode_list(&f.subjects_discussed)?,
                encode_list(&f.associated_people_orgs)?,
                encode_list(&f.document_contributors)?,
                f.source,
                f.original_upload_date,
                encode_list(&f.original_archive_title)?,
                encode_list(&f.language)?,
                f.rights,
                f.record_id,
                f.original_classification,
                encode_list(&f.donors)?,
                record.scraped_at,
            ],
        )?;
        Ok(())
    }

    fn get_item(&self, url: &str) -> StorageResult<Option<DocumentRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} WHERE document_url = ?1", SELECT_DOCUMENT))?;

        let document = stmt
            .query_row(params![url], document_from_row)
            .optional()?;

        Ok(document)
    }

    fn all_items(&self) -> StorageResult<Vec<DocumentRecord>> {
        // SQLite sorts NULL before any value in ascending order.
        let mut stmt = self.conn.prepare(&format!(
            "{} ORDER BY page_number ASC, page_position ASC, document_url ASC",
            SELECT_DOCUMENT
        ))?;

        let documents = stmt
            .query_map([], document_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(documents)
    }

    // ===== Statistics =====

    fn stats(&self) -> StorageResult<StoreStats> {
        let item_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        let completed_page_count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM completed_pages", [], |row| {
                    row.get(0)
                })?;

        Ok(StoreStats {
            item_count: item_count as u64,
            completed_page_count: completed_page_count as u64,
        })
    }
}
