//! gocite-common: Shared types and errors used across all gocite crates.

pub mod error;
pub mod records;

// Re-export commonly used types
pub use error::{GociteError, Result};
pub use records::{load_raw_records, raw_records_from_json, AnnotationRecord, PaperMetadata, NOT_AVAILABLE};
