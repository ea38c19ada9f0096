//! Harvested document records

/// The fixed metadata payload extracted from one document page
///
/// Scalar and labeled-block fields are plain optional strings; tag lists keep
/// their on-page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFields {
    pub original_publication_date: Option<String>,
    pub title: Option<String>,
    pub credits: Option<String>,
    pub text_body: Option<String>,
    pub summary: Option<String>,
    pub authors: Option<Vec<String>>,
    pub associated_places: Option<Vec<String>>,
    pub subjects_discussed: Option<Vec<String>>,
    pub associated_people_orgs: Option<Vec<String>>,
    pub document_contributors: Option<Vec<String>>,
    pub source: Option<String>,
    pub original_upload_date: Option<String>,
    pub original_archive_title: Option<Vec<String>>,
    pub language: Option<Vec<String>>,
    pub rights: Option<String>,
    pub record_id: Option<String>,
    pub original_classification: Option<String>,
    pub donors: Option<Vec<String>>,
}

/// One harvested document, keyed by its canonical URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    pub document_url: String,
    /// Results page the document was found on (0-based, as the archive numbers them)
    pub page_number: Option<i64>,
    /// 1-based position within that page
    pub page_position: Option<i64>,
    pub fields: DocumentFields,
    /// RFC 3339 capture time
    pub scraped_at: String,
}

impl DocumentRecord {
    pub fn new(document_url: impl Into<String>, fields: DocumentFields) -> Self {
        Self {
            document_url: document_url.into(),
            page_number: None,
            page_position: None,
            fields,
            scraped_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Attaches provenance within the results listing
    pub fn at(mut self, page_number: u32, page_position: usize) -> Self {
        self.page_number = Some(i64::from(page_number));
        self.page_position = Some(page_position as i64);
        self
    }

    /// Page number as displayed to people (1-based)
    pub fn display_page_number(&self) -> Option<i64> {
        self.page_number.map(|n| n + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_page_number() {
        let record = DocumentRecord::new("https://example.com/document/1", DocumentFields::default())
            .at(4, 2);
        assert_eq!(record.page_number, Some(4));
        assert_eq!(record.page_position, Some(2));
        assert_eq!(record.display_page_number(), Some(5));

        let orphan = DocumentRecord::new("https://example.com/document/2", DocumentFields::default());
        assert_eq!(orphan.display_page_number(), None);
    }

    #[test]
    fn test_scraped_at_is_rfc3339() {
        let record = DocumentRecord::new("https://example.com/document/1", DocumentFields::default());
        assert!(chrono::DateTime::parse_from_rfc3339(&record.scraped_at).is_ok());
    }
}
