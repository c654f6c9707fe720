//! CSV export of annotation records.
//!
//! One row per record, user-entered paper metadata repeated on every row:
//!   Gene, Isoform, Ensembl Accession, pubmedid, title, abstract/Full-length,
//!   GO Terms, GO Titles, excerpt, reasoning

use std::path::{Path, PathBuf};

use gocite_common::{AnnotationRecord, PaperMetadata};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub const CSV_HEADER: &str =
    "Gene,Isoform,Ensembl Accession,pubmedid,title,abstract/Full-length,GO Terms,GO Titles,excerpt,reasoning";

const DEFAULT_ALL_FILE: &str = "All_Goterms";
const DEFAULT_ONE_PREFIX: &str = "Goterm";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV output was not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// How field values are quoted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteMode {
    /// Every field wrapped in `"`, embedded quotes written as-is.
    /// A value containing `"` produces a malformed row.
    #[default]
    Verbatim,
    /// Every field wrapped in `"`, embedded quotes doubled (RFC 4180).
    Escaped,
}

/// Builds CSV exports for one annotated text.
#[derive(Debug, Clone)]
pub struct CsvExporter<'a> {
    pub metadata: &'a PaperMetadata,
    /// The full text that was annotated.
    pub text: &'a str,
    pub quoting: QuoteMode,
}

impl<'a> CsvExporter<'a> {
    pub fn new(metadata: &'a PaperMetadata, text: &'a str) -> Self {
        Self { metadata, text, quoting: QuoteMode::default() }
    }

    pub fn with_quoting(mut self, quoting: QuoteMode) -> Self {
        self.quoting = quoting;
        self
    }

    fn fields<'r>(&'r self, record: &'r AnnotationRecord) -> [&'r str; 10] {
        [
            self.metadata.gene.as_str(),
            self.metadata.isoform.as_str(),
            self.metadata.ensembl_accession.as_str(),
            self.metadata.paper_id.as_str(),
            self.metadata.title.as_str(),
            self.text,
            record.term_id.as_str(),
            record.term_name.as_str(),
            record.citation.as_str(),
            record.reason.as_str(),
        ]
    }

    fn rows(&self, records: &[AnnotationRecord]) -> Result<String> {
        match self.quoting {
            QuoteMode::Verbatim => Ok(records
                .iter()
                .map(|r| {
                    let row = self
                        .fields(r)
                        .iter()
                        .map(|f| format!("\"{}\"", f))
                        .collect::<Vec<_>>()
                        .join(",");
                    row + "\n"
                })
                .collect()),
            QuoteMode::Escaped => {
                let mut writer = csv::WriterBuilder::new()
                    .quote_style(csv::QuoteStyle::Always)
                    .terminator(csv::Terminator::Any(b'\n'))
                    .from_writer(Vec::new());
                for record in records {
                    writer.write_record(self.fields(record))?;
                }
                let bytes = writer.into_inner().map_err(|e| e.into_error())?;
                Ok(String::from_utf8(bytes)?)
            }
        }
    }

    /// Header plus one newline-terminated row per record.
    pub fn export_all(&self, records: &[AnnotationRecord]) -> Result<String> {
        Ok(format!("{}\n{}", CSV_HEADER, self.rows(records)?))
    }

    /// Header plus a single row, without a trailing newline.
    pub fn export_one(&self, record: &AnnotationRecord) -> Result<String> {
        let rows = self.rows(std::slice::from_ref(record))?;
        Ok(format!("{}\n{}", CSV_HEADER, rows.trim_end_matches('\n')))
    }
}

/// File name for the export of every record.
pub fn all_file_name(stem: &str) -> String {
    if stem.is_empty() {
        format!("{}.csv", DEFAULT_ALL_FILE)
    } else {
        format!("{}.csv", stem)
    }
}

/// File name for the export of record `index` (0-based).
pub fn record_file_name(stem: &str, index: usize) -> String {
    if stem.is_empty() {
        format!("{}_{}.csv", DEFAULT_ONE_PREFIX, index + 1)
    } else {
        format!("{}_{}.csv", stem, index + 1)
    }
}

/// Write `contents` to `dir/file_name`, returning the full path.
pub fn write_csv(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, contents)?;
    info!("Wrote {}", path.display());
    Ok(path)
}
