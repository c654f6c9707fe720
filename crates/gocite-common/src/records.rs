//! Core annotation types shared by the highlighter, the exporter and the
//! service client.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GociteError, Result};

/// Placeholder substituted for any record field whose label is missing.
pub const NOT_AVAILABLE: &str = "N/A";

const QUICKGO_TERM_URL: &str = "https://www.ebi.ac.uk/QuickGO/term";

// ---------------------------------------------------------------------------
// Annotation record
// ---------------------------------------------------------------------------

/// One GO-term association reported by the annotation model.
///
/// Built once by the record parser and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// GO identifier (`GO:0008284`) or [`NOT_AVAILABLE`].
    pub term_id: String,
    pub term_name: String,
    /// Excerpt of the input text the model cited as evidence.
    pub citation: String,
    pub reason: String,
}

impl AnnotationRecord {
    /// A record with every field set to the placeholder.
    pub fn unavailable() -> Self {
        Self {
            term_id: NOT_AVAILABLE.to_string(),
            term_name: NOT_AVAILABLE.to_string(),
            citation: NOT_AVAILABLE.to_string(),
            reason: NOT_AVAILABLE.to_string(),
        }
    }

    /// True when the citation label was found and carries some text.
    pub fn has_citation(&self) -> bool {
        let citation = self.citation.trim();
        !citation.is_empty() && citation != NOT_AVAILABLE
    }

    /// QuickGO term page for this record's GO identifier.
    pub fn quickgo_url(&self) -> Option<String> {
        if self.term_id == NOT_AVAILABLE || self.term_id.trim().is_empty() {
            return None;
        }
        Some(format!("{}/{}", QUICKGO_TERM_URL, self.term_id))
    }
}

// ---------------------------------------------------------------------------
// Paper metadata (user-entered)
// ---------------------------------------------------------------------------

/// User-entered metadata describing the paper and the isoform being annotated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperMetadata {
    pub gene: String,
    /// Isoform name; also sent to the service as `name`.
    pub isoform: String,
    pub ensembl_accession: String,
    /// PubMed id of the paper.
    pub paper_id: String,
    pub title: String,
}

// ---------------------------------------------------------------------------
// Saved model output
// ---------------------------------------------------------------------------

/// Raw model records from JSON: either an array of record strings or a
/// saved service response carrying them under `goterms`.
pub fn raw_records_from_json(json: &str) -> Result<Vec<String>> {
    let value: Value = serde_json::from_str(json)?;
    let list = match value {
        Value::Object(mut obj) => obj
            .remove("goterms")
            .ok_or_else(|| GociteError::InvalidRecords("object has no `goterms` field".to_string()))?,
        other => other,
    };
    match list {
        Value::Array(_) => Ok(serde_json::from_value(list)?),
        _ => Err(GociteError::InvalidRecords(
            "expected a JSON array of record strings".to_string(),
        )),
    }
}

pub fn load_raw_records(path: &Path) -> Result<Vec<String>> {
    raw_records_from_json(&std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quickgo_url() {
        let record = AnnotationRecord {
            term_id: "GO:0008284".to_string(),
            term_name: "positive regulation of cell population proliferation".to_string(),
            citation: "increased proliferation".to_string(),
            reason: "direct evidence".to_string(),
        };
        assert_eq!(
            record.quickgo_url().as_deref(),
            Some("https://www.ebi.ac.uk/QuickGO/term/GO:0008284")
        );
        assert_eq!(AnnotationRecord::unavailable().quickgo_url(), None);
    }

    #[test]
    fn test_placeholder_citation_is_not_evidence() {
        let mut record = AnnotationRecord::unavailable();
        assert!(!record.has_citation());
        record.citation = "   ".to_string();
        assert!(!record.has_citation());
        record.citation = "cell proliferation".to_string();
        assert!(record.has_citation());
    }

    #[test]
    fn test_raw_records_from_array_or_response() {
        let expected = vec!["GO:0000001".to_string(), "GO:0000002".to_string()];
        assert_eq!(raw_records_from_json(r#"["GO:0000001", "GO:0000002"]"#).unwrap(), expected);
        assert_eq!(
            raw_records_from_json(r#"{"goterms": ["GO:0000001", "GO:0000002"]}"#).unwrap(),
            expected
        );
    }

    #[test]
    fn test_raw_records_rejects_other_shapes() {
        assert!(matches!(
            raw_records_from_json(r#"{"error": "No model loaded"}"#),
            Err(GociteError::InvalidRecords(_))
        ));
        assert!(matches!(raw_records_from_json("42"), Err(GociteError::InvalidRecords(_))));
        assert!(matches!(raw_records_from_json("[1, 2]"), Err(GociteError::Serialization(_))));
        assert!(matches!(raw_records_from_json("not json"), Err(GociteError::Serialization(_))));
    }
}
