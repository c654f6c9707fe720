//! One annotation session: selected and loaded model, the paper being
//! annotated and the last annotated document.
//!
//! Every user action is validated locally first; a failed validation never
//! reaches the service. Service calls are issued once and their errors are
//! returned as-is.

use gocite_client::{AnnotationService, PubmedSearch, ServiceError, Submission};
use gocite_common::PaperMetadata;
use gocite_highlight::{annotate, AnnotatedDocument};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Please select a model first.")]
    NoModelSelected,
    #[error("No model is currently loaded.")]
    NoModelLoaded,
    #[error("Please load a model first before submitting text.")]
    SubmitWithoutModel,
    #[error("Please enter text input.")]
    EmptyText,
    #[error("Please upload a PDF file.")]
    NoPdf,
    #[error("Please enter an isoform name.")]
    NoIsoform,
    #[error("Please load a model before using Smart-Extract.")]
    ExtractWithoutModel,
    #[error("Please enter a PubMed query.")]
    EmptyQuery,
    #[error(transparent)]
    Service(#[from] ServiceError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

pub struct Session<S: AnnotationService> {
    service: S,
    pub metadata: PaperMetadata,
    pub selected_model: Option<String>,
    loaded_model: Option<String>,
    /// Text to annotate; smart-extract and PubMed search replace it.
    pub text_input: String,
    pub custom_prompt: Option<String>,
    document: Option<AnnotatedDocument>,
}

impl<S: AnnotationService> Session<S> {
    pub fn new(service: S, metadata: PaperMetadata) -> Self {
        Self {
            service,
            metadata,
            selected_model: None,
            loaded_model: None,
            text_input: String::new(),
            custom_prompt: None,
            document: None,
        }
    }

    pub fn select_model(&mut self, model_id: impl Into<String>) {
        self.selected_model = Some(model_id.into());
    }

    pub async fn load_model(&mut self) -> Result<String> {
        let model = match self.selected_model.as_deref() {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => return Err(SessionError::NoModelSelected),
        };
        let message = self.service.load_model(&model).await?;
        info!("{}", message);
        self.loaded_model = Some(model);
        Ok(message)
    }

    pub async fn unload_model(&mut self) -> Result<String> {
        if self.loaded_model.is_none() {
            return Err(SessionError::NoModelLoaded);
        }
        let message = self.service.unload_model().await?;
        info!("{}", message);
        self.loaded_model = None;
        Ok(message)
    }

    /// Submit the current text and re-annotate it from the returned records.
    pub async fn submit(&mut self) -> Result<&AnnotatedDocument> {
        if self.loaded_model.is_none() {
            return Err(SessionError::SubmitWithoutModel);
        }
        if self.text_input.is_empty() {
            return Err(SessionError::EmptyText);
        }

        let mut submission = Submission::new(self.text_input.clone(), self.metadata.clone());
        submission.custom_prompt = self.custom_prompt.clone();
        let records = self.service.submit_text(&submission).await?;

        let document = annotate(&self.text_input, &records);
        Ok(&*self.document.insert(document))
    }

    /// Extract text from a PDF for the session's isoform; the result
    /// becomes the text input.
    pub async fn smart_extract(&mut self, pdf: Vec<u8>, file_name: &str) -> Result<&str> {
        if pdf.is_empty() {
            return Err(SessionError::NoPdf);
        }
        if self.metadata.isoform.is_empty() {
            return Err(SessionError::NoIsoform);
        }
        if self.loaded_model.is_none() {
            return Err(SessionError::ExtractWithoutModel);
        }

        self.text_input = self
            .service
            .smart_extract(pdf, file_name, &self.metadata.isoform)
            .await?;
        info!("Smart extraction completed successfully!");
        Ok(&self.text_input)
    }

    /// Search PubMed; the combined abstract text becomes the text input.
    pub async fn pubmed_search(&mut self, query: &str) -> Result<PubmedSearch> {
        if query.trim().is_empty() {
            return Err(SessionError::EmptyQuery);
        }
        let search = self.service.pubmed_search(query).await?;
        info!("{}", search.message);
        self.text_input = search.result.combined_text();
        Ok(search)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gocite_client::PubmedResult;
    use gocite_test_utils::{model_records, sample_metadata, PAPER_TEXT};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockService {
        calls: Mutex<Vec<String>>,
        fail_load: bool,
    }

    impl MockService {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl AnnotationService for MockService {
        async fn list_models(&self) -> std::result::Result<Vec<String>, ServiceError> {
            self.record("list".to_string());
            Ok(vec!["llama-3-8b".to_string()])
        }

        async fn load_model(&self, model_id: &str) -> std::result::Result<String, ServiceError> {
            self.record(format!("load {model_id}"));
            if self.fail_load {
                return Err(ServiceError::Api { status: 404, message: "Model not found".to_string() });
            }
            Ok(format!("Model {model_id} loaded successfully"))
        }

        async fn unload_model(&self) -> std::result::Result<String, ServiceError> {
            self.record("unload".to_string());
            Ok("Model unloaded successfully".to_string())
        }

        async fn submit_text(&self, submission: &Submission) -> std::result::Result<Vec<String>, ServiceError> {
            self.record(format!("submit prompt={:?}", submission.effective_prompt()));
            Ok(model_records())
        }

        async fn smart_extract(
            &self,
            pdf: Vec<u8>,
            file_name: &str,
            isoform: &str,
        ) -> std::result::Result<String, ServiceError> {
            self.record(format!("extract {file_name} {} {isoform}", pdf.len()));
            Ok(PAPER_TEXT.to_string())
        }

        async fn pubmed_search(&self, query: &str) -> std::result::Result<PubmedSearch, ServiceError> {
            self.record(format!("pubmed {query}"));
            Ok(PubmedSearch {
                message: "Search completed".to_string(),
                result: PubmedResult {
                    total_found: 2,
                    article_count: 2,
                    errors: vec![],
                    texts: vec![" one".to_string(), " one two".to_string()],
                },
            })
        }
    }

    fn session() -> Session<MockService> {
        Session::new(MockService::default(), sample_metadata())
    }

    #[tokio::test]
    async fn test_load_requires_selection() {
        let mut s = session();
        let err = s.load_model().await.unwrap_err();
        assert_eq!(err.to_string(), "Please select a model first.");
        assert!(s.service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_load_then_unload() {
        let mut s = session();
        s.select_model("llama-3-8b");
        assert_eq!(s.load_model().await.unwrap(), "Model llama-3-8b loaded successfully");
        assert_eq!(s.loaded_model.as_deref(), Some("llama-3-8b"));
        s.unload_model().await.unwrap();
        assert_eq!(s.loaded_model, None);
        assert_eq!(s.service.calls(), vec!["load llama-3-8b", "unload"]);
    }

    #[tokio::test]
    async fn test_failed_load_leaves_nothing_loaded() {
        let mut s = Session::new(MockService { fail_load: true, ..Default::default() }, sample_metadata());
        s.select_model("missing");
        let err = s.load_model().await.unwrap_err();
        assert!(matches!(err, SessionError::Service(ServiceError::Api { status: 404, .. })));
        assert_eq!(s.loaded_model, None);
    }

    #[tokio::test]
    async fn test_unload_with_nothing_loaded() {
        let mut s = session();
        let err = s.unload_model().await.unwrap_err();
        assert_eq!(err.to_string(), "No model is currently loaded.");
        assert!(s.service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_submit_validations_in_order() {
        let mut s = session();
        assert!(matches!(s.submit().await, Err(SessionError::SubmitWithoutModel)));

        s.select_model("llama-3-8b");
        s.load_model().await.unwrap();
        assert!(matches!(s.submit().await, Err(SessionError::EmptyText)));
        assert_eq!(s.service.calls(), vec!["load llama-3-8b"]);
    }

    #[tokio::test]
    async fn test_submit_annotates_text() {
        let mut s = session();
        s.select_model("llama-3-8b");
        s.load_model().await.unwrap();
        s.text_input = PAPER_TEXT.to_string();
        s.custom_prompt = Some("  ".to_string());

        let doc = s.submit().await.unwrap();
        assert_eq!(doc.records.len(), 5);
        assert_eq!(doc.highlighted.spans.len(), 3);
        assert!(s.document.is_some());
        assert_eq!(s.service.calls()[1], "submit prompt=None");
    }

    #[tokio::test]
    async fn test_smart_extract_validations() {
        let mut s = session();
        assert!(matches!(s.smart_extract(vec![], "a.pdf").await, Err(SessionError::NoPdf)));

        s.metadata.isoform.clear();
        let err = s.smart_extract(vec![1], "a.pdf").await.unwrap_err();
        assert_eq!(err.to_string(), "Please enter an isoform name.");

        s.metadata.isoform = "ABC1-b".to_string();
        let err = s.smart_extract(vec![1], "a.pdf").await.unwrap_err();
        assert_eq!(err.to_string(), "Please load a model before using Smart-Extract.");
        assert!(s.service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_smart_extract_replaces_text_input() {
        let mut s = session();
        s.select_model("llama-3-8b");
        s.load_model().await.unwrap();
        s.text_input = "old".to_string();
        let text = s.smart_extract(vec![1, 2, 3], "paper.pdf").await.unwrap().to_string();
        assert_eq!(text, PAPER_TEXT);
        assert_eq!(s.text_input, PAPER_TEXT);
        assert_eq!(s.service.calls()[1], "extract paper.pdf 3 ABC1-b");
    }

    #[tokio::test]
    async fn test_pubmed_search() {
        let mut s = session();
        let err = s.pubmed_search("   ").await.unwrap_err();
        assert_eq!(err.to_string(), "Please enter a PubMed query.");

        let search = s.pubmed_search("ABC1").await.unwrap();
        assert_eq!(search.result.article_count, 2);
        assert_eq!(s.text_input, "one two");
    }
}
