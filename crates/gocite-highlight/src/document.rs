//! Pure annotation entry point: raw text + raw model records in,
//! parsed records and highlighted markup out. No session state.

use gocite_common::AnnotationRecord;
use tracing::info;

use crate::citations::CitationSet;
use crate::parser::parse_all;
use crate::render::{render_document, HighlightedDocument};

/// Everything the view layer needs to display one annotated text.
#[derive(Debug, Clone)]
pub struct AnnotatedDocument {
    pub raw_text: String,
    pub records: Vec<AnnotationRecord>,
    pub citations: CitationSet,
    pub highlighted: HighlightedDocument,
}

impl AnnotatedDocument {
    /// Records whose citation equals `citation` (the highlight click lookup).
    pub fn records_for_citation(&self, citation: &str) -> Vec<&AnnotationRecord> {
        self.records.iter().filter(|r| r.citation == citation).collect()
    }

    /// Distinct citations paired with the records that cite them.
    pub fn grouped(&self) -> Vec<(&str, Vec<&AnnotationRecord>)> {
        self.citations
            .iter()
            .map(|c| (c, self.records_for_citation(c)))
            .collect()
    }
}

/// Parse `raw_records`, derive the citation set and render `raw_text`.
///
/// Regenerated in full on every call.
pub fn annotate<I, S>(raw_text: &str, raw_records: I) -> AnnotatedDocument
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let records = parse_all(raw_records);
    let citations = CitationSet::from_records(&records);
    let highlighted = render_document(raw_text, &citations);

    info!(
        "Extracted {} terms for highlighting ({} citations, {} highlighted spans)",
        records.len(),
        citations.len(),
        highlighted.spans.len()
    );

    AnnotatedDocument {
        raw_text: raw_text.to_string(),
        records,
        citations,
        highlighted,
    }
}
