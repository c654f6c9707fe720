//! Shared fixtures for gocite tests: a wrapped paper excerpt, the records a
//! model would return for it, and helpers to put both on disk.

use std::path::{Path, PathBuf};

use gocite_common::PaperMetadata;

/// Excerpt as pasted from a PDF: hard line wraps and a hyphenated break.
pub const PAPER_TEXT: &str = "Isoform ABC1-b localizes to the outer mitochondrial\n\
membrane, where it promotes cardiac muscle cell prolif-\n\
eration. Knockdown of ABC1-b caused increased apoptosis\n\
in human cardiomyocytes, whereas ABC1-a had no effect.";

/// Records in the model's output format, citations quoted from a re-flowed copy.
pub fn model_records() -> Vec<String> {
    vec![
        "Goterm 1: GO:0005741\nName: mitochondrial outer membrane\nText Citation: \"localizes to the outer mitochondrial membrane\"\nReason: direct localization ;".to_string(),
        "Goterm 2: GO:0060038\nName: cardiac muscle cell proliferation\nText Citation: \u{201C}promotes cardiac muscle cell\u{201D}\nReason: promotes proliferation ;".to_string(),
        "Goterm 3: GO:0043066\nName: negative regulation of apoptotic process\nText Citation: \"Knockdown of ABC1-b caused increased apoptosis in human cardiomyocytes\"\nReason: knockdown phenotype ;".to_string(),
        "Goterm 4: GO:0006915\nName: apoptotic process\nText Citation: \"increased apoptosis\"\nReason: overlaps an earlier citation ;".to_string(),
        "Goterm 5: GO:0008150\nName: biological_process\nText Citation: \"this sentence is not in the paper\"\nReason: hallucinated ;".to_string(),
    ]
}

pub fn sample_metadata() -> PaperMetadata {
    PaperMetadata {
        gene: "ABC1".to_string(),
        isoform: "ABC1-b".to_string(),
        ensembl_accession: "ENST00000000001".to_string(),
        paper_id: "12345678".to_string(),
        title: "ABC1-b in cardiomyocytes".to_string(),
    }
}

/// Write `records` as a JSON array to `dir/records.json`.
pub fn write_records_file(dir: &Path, records: &[String]) -> PathBuf {
    let path = dir.join("records.json");
    let json = serde_json::to_string_pretty(records).expect("serialize records");
    std::fs::write(&path, json).expect("write records fixture");
    path
}

/// Write `text` to `dir/paper.txt`.
pub fn write_text_file(dir: &Path, text: &str) -> PathBuf {
    let path = dir.join("paper.txt");
    std::fs::write(&path, text).expect("write text fixture");
    path
}

/// Fresh temporary directory for a test.
pub fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("create temp dir")
}
