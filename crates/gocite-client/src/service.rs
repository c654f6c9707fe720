//! Annotation service trait and its request/response types.
//!
//! The service owns model lifecycle, GO-term extraction, PDF text extraction
//! and PubMed search. Every call is issued once: no retry, no backoff.

use async_trait::async_trait;
use gocite_common::PaperMetadata;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("API error [{status}]: {message}")]
    Api { status: u16, message: String },
    /// The service answered but refused the request (`{"error": ...}` body).
    #[error("{0}")]
    Rejected(String),
}

// ── Request / Response ────────────────────────────────────────────────────────

/// Text submitted for GO-term annotation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Submission {
    pub text: String,
    pub metadata: PaperMetadata,
    /// Replaces the service's built-in prompt when non-blank.
    pub custom_prompt: Option<String>,
}

impl Submission {
    pub fn new(text: impl Into<String>, metadata: PaperMetadata) -> Self {
        Self { text: text.into(), metadata, custom_prompt: None }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.custom_prompt = Some(prompt.into());
        self
    }

    /// The custom prompt, if it carries any text.
    pub fn effective_prompt(&self) -> Option<&str> {
        self.custom_prompt
            .as_deref()
            .filter(|p| !p.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PubmedResult {
    #[serde(default)]
    pub total_found: u64,
    #[serde(default)]
    pub article_count: u64,
    /// PubMed ids that could not be fetched.
    #[serde(default)]
    pub errors: Vec<String>,
    /// Running concatenation of abstracts; each entry extends the previous one.
    #[serde(default)]
    pub texts: Vec<String>,
}

impl PubmedResult {
    /// All fetched abstracts as one text (the last cumulative entry).
    pub fn combined_text(&self) -> String {
        self.texts
            .last()
            .map(|t| t.trim().to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PubmedSearch {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result: PubmedResult,
}

// ── Trait ─────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait AnnotationService: Send + Sync {
    /// Model ids the service can load.
    async fn list_models(&self) -> Result<Vec<String>, ServiceError>;
    /// Load `model_id`; returns the service's confirmation message.
    async fn load_model(&self, model_id: &str) -> Result<String, ServiceError>;
    async fn unload_model(&self) -> Result<String, ServiceError>;
    /// Raw annotation records, one string per GO term.
    async fn submit_text(&self, submission: &Submission) -> Result<Vec<String>, ServiceError>;
    /// Text the service extracted from `pdf` for `isoform`.
    async fn smart_extract(
        &self,
        pdf: Vec<u8>,
        file_name: &str,
        isoform: &str,
    ) -> Result<String, ServiceError>;
    async fn pubmed_search(&self, query: &str) -> Result<PubmedSearch, ServiceError>;
}
