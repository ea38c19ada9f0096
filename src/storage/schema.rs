//! Database schema definitions and migrations
//!
//! This module contains all SQL schema definitions for the harvester database.

use rusqlite::Connection;
use std::collections::HashSet;

/// Canonical `documents` columns, in storage and export order
pub const DOCUMENT_COLUMNS: &[(&str, &str)] = &[
    ("document_url", "TEXT PRIMARY KEY"),
    ("page_number", "INTEGER"),
    ("page_position", "INTEGER"),
    ("original_publication_date", "TEXT"),
    ("title", "TEXT"),
    ("credits", "TEXT"),
    ("text_body", "TEXT"),
    ("summary", "TEXT"),
    ("authors", "TEXT"),
    ("associated_places", "TEXT"),
    ("subjects_discussed", "TEXT"),
    ("associated_people_orgs", "TEXT"),
    ("document_contributors", "TEXT"),
    ("source", "TEXT"),
    ("original_upload_date", "TEXT"),
    ("original_archive_title", "TEXT"),
    ("language", "TEXT"),
    ("rights", "TEXT"),
    ("record_id", "TEXT"),
    ("original_classification", "TEXT"),
    ("donors", "TEXT"),
    ("scraped_at", "TEXT"),
];

/// SQL for the page completion ledger
const COMPLETED_PAGES_SQL: &str = r#"
-- One row per results page that has been attempted
CREATE TABLE IF NOT EXISTS completed_pages (
    page_number INTEGER PRIMARY KEY,
    completed_at TEXT
);
"#;

/// Indexes backing the export ordering; created after migration so the
/// columns they cover are guaranteed to exist
const INDEX_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_documents_page_number ON documents(page_number);
CREATE INDEX IF NOT EXISTS idx_documents_page_position ON documents(page_number, page_position);
"#;

/// Builds the `CREATE TABLE` statement for `documents` from the column list
fn documents_table_sql() -> String {
    let columns = DOCUMENT_COLUMNS
        .iter()
        .map(|(name, ty)| format!("    {} {}", name, ty))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("CREATE TABLE IF NOT EXISTS documents (\n{}\n);", columns)
}

/// Initializes the database schema
///
/// Safe to run against an existing database: tables are only created when
/// missing and older `documents` tables are migrated in place.
pub fn initialize_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(&documents_table_sql())?;
    conn.execute_batch(COMPLETED_PAGES_SQL)?;
    let added = migrate_documents(conn)?;
    if !added.is_empty() {
        tracing::info!("Migrated documents table, added columns: {}", added.join(", "));
    }
    conn.execute_batch(INDEX_SQL)?;
    Ok(())
}

/// Adds every canonical column missing from `documents`
///
/// Only nullable columns are ever added, so existing rows read them as NULL.
/// Returns the names of the columns that were added.
pub fn migrate_documents(conn: &Connection) -> Result<Vec<&'static str>, rusqlite::Error> {
    let existing = existing_columns(conn, "documents")?;
    let mut added = Vec::new();

    for (name, ty) in DOCUMENT_COLUMNS {
        if existing.contains(*name) {
            continue;
        }
        // PRIMARY KEY cannot be added after the fact; the table always has it.
        let ty = ty.trim_end_matches(" PRIMARY KEY");
        conn.execute_batch(&format!("ALTER TABLE documents ADD COLUMN {} {};", name, ty))?;
        added.push(*name);
    }

    Ok(added)
}

fn existing_columns(conn: &Connection, table: &str) -> Result<HashSet<String>, rusqlite::Error> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<HashSet<_>, _>>()?;
    Ok(names)
}
