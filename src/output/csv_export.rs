//! CSV export of harvested documents
//!
//! Columns follow the stored schema order, with one derived column,
//! `page_number_one_indexed`, right after `page_number`. Missing values are
//! written as empty cells and tag lists as JSON arrays, exactly as stored.

use crate::record::DocumentRecord;
use crate::storage::{Storage, StorageError, DOCUMENT_COLUMNS};
use crate::Result;
use std::io::Write;
use std::path::Path;

/// Name of the derived 1-based page column
pub const DISPLAY_PAGE_COLUMN: &str = "page_number_one_indexed";

/// Header row: stored columns plus the derived page column
pub fn export_header() -> Vec<&'static str> {
    let mut header = Vec::with_capacity(DOCUMENT_COLUMNS.len() + 1);
    for (name, _) in DOCUMENT_COLUMNS {
        header.push(*name);
        if *name == "page_number" {
            header.push(DISPLAY_PAGE_COLUMN);
        }
    }
    header
}

/// Exports every stored document to a CSV file at `path`
///
/// Returns the number of rows written. An empty store writes no file.
pub fn export_csv(storage: &dyn Storage, path: &Path) -> Result<usize> {
    let records = storage.all_items()?;
    if records.is_empty() {
        tracing::warn!("No documents stored; nothing exported");
        return Ok(0);
    }

    let file = std::fs::File::create(path)?;
    let rows = write_csv(&records, file)?;
    tracing::info!("Exported {} documents to {}", rows, path.display());
    Ok(rows)
}

/// Writes `records` as CSV (header first) to `writer`
pub fn write_csv<W: Write>(records: &[DocumentRecord], writer: W) -> Result<usize> {
    let header = export_header();
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(&header)?;

    for record in records {
        let row = header
            .iter()
            .map(|column| cell(record, column))
            .collect::<Result<Vec<_>>>()?;
        csv.write_record(&row)?;
    }

    csv.flush()?;
    Ok(records.len())
}

fn cell(record: &DocumentRecord, column: &str) -> Result<String> {
    let f = &record.fields;
    let value = match column {
        "document_url" => record.document_url.clone(),
        "page_number" => number(record.page_number),
        DISPLAY_PAGE_COLUMN => number(record.display_page_number()),
        "page_position" => number(record.page_position),
        "original_publication_date" => text(&f.original_publication_date),
        "title" => text(&f.title),
        "credits" => text(&f.credits),
        "text_body" => text(&f.text_body),
        "summary" => text(&f.summary),
        "authors" => list(&f.authors)?,
        "associated_places" => list(&f.associated_places)?,
        "subjects_discussed" => list(&f.subjects_discussed)?,
        "associated_people_orgs" => list(&f.associated_people_orgs)?,
        "document_contributors" => list(&f.document_contributors)?,
        "source" => text(&f.source),
        "original_upload_date" => text(&f.original_upload_date),
        "original_archive_title" => list(&f.original_archive_title)?,
        "language" => list(&f.language)?,
        "rights" => text(&f.rights),
        "record_id" => text(&f.record_id),
        "original_classification" => text(&f.original_classification),
        "donors" => list(&f.donors)?,
        "scraped_at" => record.scraped_at.clone(),
        other => {
            return Err(StorageError::Serialization(format!(
                "export column '{}' has no mapping",
                other
            ))
            .into())
        }
    };
    Ok(value)
}

fn number(value: Option<i64>) -> String {
    value.map(|n| n.to_string()).unwrap_or_default()
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn list(values: &Option<Vec<String>>) -> Result<String> {
    match values {
        Some(values) => serde_json::to_string(values)
            .map_err(|e| StorageError::Serialization(e.to_string()).into()),
        None => Ok(String::new()),
    }
}
