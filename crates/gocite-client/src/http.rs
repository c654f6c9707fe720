//! HTTP implementation of [`AnnotationService`].
//!
//! Endpoints:
//!   GET  /list-models    → ["model", ...]
//!   POST /load-model     {model_id} → {message}
//!   POST /unload-model   → {message}
//!   POST /submit-text    multipart text,name,title,paperID[,custom_prompt] → {goterms} | {error}
//!   POST /smart-extract  multipart file,isoform → {result}
//!   POST /pubmed-search  {query} → {message, result}

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::service::{AnnotationService, PubmedSearch, ServiceError, Submission};

pub struct HttpAnnotationService {
    pub base_url: String,
    client: reqwest::Client,
}

impl HttpAnnotationService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), client: reqwest::Client::new() }
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url: base_url.into(), client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Read the body as JSON and turn HTTP failures into [`ServiceError::Api`],
/// using the body's `error` field when present.
async fn check_response(resp: reqwest::Response, fallback: &str) -> Result<Value, ServiceError> {
    let status = resp.status().as_u16();
    let text = resp.text().await?;
    let body: Option<Value> = serde_json::from_str(&text).ok();

    if status >= 400 {
        let message = body
            .as_ref()
            .and_then(|b| b["error"].as_str())
            .unwrap_or(fallback)
            .to_string();
        return Err(ServiceError::Api { status, message });
    }

    match body {
        Some(body) => Ok(body),
        None => Ok(serde_json::from_str(&text)?),
    }
}

fn message_of(body: &Value) -> String {
    body["message"].as_str().unwrap_or_default().to_string()
}

#[async_trait]
impl AnnotationService for HttpAnnotationService {
    #[instrument(skip(self))]
    async fn list_models(&self) -> Result<Vec<String>, ServiceError> {
        let resp = self.client.get(self.url("list-models")).send().await?;
        let body = check_response(resp, "Error listing models").await?;
        let models: Vec<String> = serde_json::from_value(body)?;
        debug!(count = models.len(), "Listed models");
        Ok(models)
    }

    #[instrument(skip(self))]
    async fn load_model(&self, model_id: &str) -> Result<String, ServiceError> {
        let resp = self
            .client
            .post(self.url("load-model"))
            .json(&serde_json::json!({ "model_id": model_id }))
            .send()
            .await?;
        let body = check_response(resp, "Error loading model").await?;
        Ok(message_of(&body))
    }

    #[instrument(skip(self))]
    async fn unload_model(&self) -> Result<String, ServiceError> {
        let resp = self.client.post(self.url("unload-model")).send().await?;
        let body = check_response(resp, "Error unloading model").await?;
        Ok(message_of(&body))
    }

    #[instrument(skip(self, submission), fields(chars = submission.text.len()))]
    async fn submit_text(&self, submission: &Submission) -> Result<Vec<String>, ServiceError> {
        let meta = &submission.metadata;
        let mut form = Form::new()
            .text("text", submission.text.clone())
            .text("name", meta.isoform.clone())
            .text("title", meta.title.clone())
            .text("paperID", meta.paper_id.clone());
        if let Some(prompt) = submission.effective_prompt() {
            form = form.text("custom_prompt", prompt.to_string());
        }

        let resp = self.client.post(self.url("submit-text")).multipart(form).send().await?;
        let body = check_response(resp, "Error submitting text").await?;

        if let Some(error) = body["error"].as_str() {
            return Err(ServiceError::Rejected(error.to_string()));
        }

        let goterms: Vec<String> = match body.get("goterms") {
            Some(terms) => serde_json::from_value(terms.clone())?,
            None => {
                warn!("Response carried no goterms; treating as empty");
                Vec::new()
            }
        };
        debug!(count = goterms.len(), "Received annotation records");
        Ok(goterms)
    }

    #[instrument(skip(self, pdf), fields(bytes = pdf.len()))]
    async fn smart_extract(
        &self,
        pdf: Vec<u8>,
        file_name: &str,
        isoform: &str,
    ) -> Result<String, ServiceError> {
        let part = Part::bytes(pdf)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = Form::new()
            .part("file", part)
            .text("isoform", isoform.to_string());

        let resp = self.client.post(self.url("smart-extract")).multipart(form).send().await?;
        let body = check_response(resp, "Failed to perform smart extraction.").await?;
        Ok(body["result"].as_str().unwrap_or_default().to_string())
    }

    #[instrument(skip(self))]
    async fn pubmed_search(&self, query: &str) -> Result<PubmedSearch, ServiceError> {
        let resp = self
            .client
            .post(self.url("pubmed-search"))
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await?;
        let body = check_response(resp, "PubMed search failed").await?;
        Ok(serde_json::from_value(body)?)
    }
}
