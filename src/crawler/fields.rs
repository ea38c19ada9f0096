//! Binds every document column to its extraction strategy

use crate::crawler::extractor::{direct_text, extract_field, information_block, tag_list};
use crate::record::DocumentFields;
use crate::render::Query;

fn text(doc: &dyn Query, field: &str, selectors: &[&str]) -> Option<String> {
    extract_field(field, doc, |d| direct_text(d, selectors))
}

fn block(doc: &dyn Query, field: &str, label: &str) -> Option<String> {
    extract_field(field, doc, |d| information_block(d, label))
}

fn tags(doc: &dyn Query, field: &str, heading: &str) -> Option<Vec<String>> {
    extract_field(field, doc, |d| tag_list(d, heading))
}

/// Extracts the full metadata payload from a rendered document page
///
/// Never fails: a field whose lookup finds nothing or faults is left as `None`.
pub fn extract_fields(doc: &dyn Query) -> DocumentFields {
    DocumentFields {
        original_publication_date: text(doc, "original_publication_date", &[".date"]),
        title: text(doc, "title", &["h1.title"]),
        credits: text(doc, "credits", &[".donated"]),
        text_body: text(doc, "text_body", &[".tab-pane.active"]),
        summary: text(doc, "summary", &[".text-block"]),
        authors: tags(doc, "authors", "Author"),
        associated_places: tags(doc, "associated_places", "Associated Places"),
        subjects_discussed: tags(doc, "subjects_discussed", "Subjects Discussed"),
        associated_people_orgs: tags(doc, "associated_people_orgs", "Associated People"),
        document_contributors: tags(doc, "document_contributors", "Document Contributor"),
        source: block(doc, "source", "Source"),
        original_upload_date: block(doc, "original_upload_date", "Original Uploaded Date"),
        original_archive_title: tags(doc, "original_archive_title", "Original Archive"),
        language: tags(doc, "language", "Language"),
        rights: block(doc, "rights", "Rights"),
        record_id: block(doc, "record_id", "Record ID"),
        original_classification: block(
            doc,
            "original_classification",
            "Original Classification",
        ),
        donors: tags(doc, "donors", "Donor"),
    }
}
