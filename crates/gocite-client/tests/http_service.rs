//! HttpAnnotationService against an in-process axum server.

use std::collections::BTreeMap;

use axum::extract::{Json, Multipart};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use gocite_client::{AnnotationService, HttpAnnotationService, ServiceError, Submission};
use gocite_test_utils::sample_metadata;
use serde_json::{json, Value};

async fn list_models() -> Json<Value> {
    Json(json!(["llama-3-8b", "mistral-7b"]))
}

async fn load_model(Json(body): Json<Value>) -> Response {
    match body["model_id"].as_str().unwrap_or_default() {
        "missing" => (StatusCode::NOT_FOUND, Json(json!({ "error": "Model not found" }))).into_response(),
        "broken" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        id => Json(json!({ "message": format!("Model {id} loaded successfully") })).into_response(),
    }
}

async fn unload_model() -> Json<Value> {
    Json(json!({ "message": "Model unloaded successfully" }))
}

/// Collects every text field; file fields are summarised as name|type|len.
async fn form_fields(mut multipart: Multipart) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let value = match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.unwrap();
                format!("{file_name}|{content_type}|{}", bytes.len())
            }
            None => field.text().await.unwrap(),
        };
        fields.insert(name, value);
    }
    fields
}

async fn submit_text(multipart: Multipart) -> Json<Value> {
    let fields = form_fields(multipart).await;
    if fields.get("text").map(String::as_str) == Some("reject me") {
        return Json(json!({ "error": "No model loaded" }));
    }
    if fields.get("text").map(String::as_str) == Some("no terms") {
        return Json(json!({}));
    }
    let echoed: Vec<String> = fields.iter().map(|(k, v)| format!("{k}={v}")).collect();
    Json(json!({ "goterms": echoed }))
}

async fn smart_extract(multipart: Multipart) -> Json<Value> {
    let fields = form_fields(multipart).await;
    Json(json!({ "result": format!("{} for {}", fields["file"], fields["isoform"]) }))
}

async fn pubmed_search(Json(body): Json<Value>) -> Response {
    if body["query"].as_str() == Some("fail") {
        return (StatusCode::BAD_GATEWAY, Json(json!({}))).into_response();
    }
    Json(json!({
        "message": "Search completed",
        "result": {
            "total_found": 2,
            "article_count": 2,
            "errors": [],
            "texts": [" first abstract", " first abstract second abstract"]
        }
    }))
    .into_response()
}

async fn spawn_server() -> HttpAnnotationService {
    let app = Router::new()
        .route("/list-models", get(list_models))
        .route("/load-model", post(load_model))
        .route("/unload-model", post(unload_model))
        .route("/submit-text", post(submit_text))
        .route("/smart-extract", post(smart_extract))
        .route("/pubmed-search", post(pubmed_search));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    HttpAnnotationService::new(format!("http://{addr}"))
}

#[tokio::test]
async fn test_list_models() {
    let service = spawn_server().await;
    let models = service.list_models().await.unwrap();
    assert_eq!(models, vec!["llama-3-8b".to_string(), "mistral-7b".to_string()]);
}

#[tokio::test]
async fn test_load_and_unload_model() {
    let service = spawn_server().await;
    let message = service.load_model("llama-3-8b").await.unwrap();
    assert_eq!(message, "Model llama-3-8b loaded successfully");
    let message = service.unload_model().await.unwrap();
    assert_eq!(message, "Model unloaded successfully");
}

#[tokio::test]
async fn test_load_error_uses_body_message() {
    let service = spawn_server().await;
    match service.load_model("missing").await {
        Err(ServiceError::Api { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Model not found");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_load_error_without_json_falls_back() {
    let service = spawn_server().await;
    match service.load_model("broken").await {
        Err(ServiceError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Error loading model");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_submit_sends_metadata_fields() {
    let service = spawn_server().await;
    let submission = Submission::new("ABC1-b promotes growth.", sample_metadata());
    let records = service.submit_text(&submission).await.unwrap();
    assert_eq!(
        records,
        vec![
            "name=ABC1-b".to_string(),
            "paperID=12345678".to_string(),
            "text=ABC1-b promotes growth.".to_string(),
            "title=ABC1-b in cardiomyocytes".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_submit_sends_custom_prompt_only_when_present() {
    let service = spawn_server().await;
    let blank = Submission::new("t", sample_metadata()).with_prompt("  ");
    let records = service.submit_text(&blank).await.unwrap();
    assert!(!records.iter().any(|r| r.starts_with("custom_prompt=")));

    let custom = Submission::new("t", sample_metadata()).with_prompt("List GO terms.");
    let records = service.submit_text(&custom).await.unwrap();
    assert!(records.contains(&"custom_prompt=List GO terms.".to_string()));
}

#[tokio::test]
async fn test_submit_error_body_is_rejected() {
    let service = spawn_server().await;
    let submission = Submission::new("reject me", sample_metadata());
    match service.submit_text(&submission).await {
        Err(ServiceError::Rejected(message)) => assert_eq!(message, "No model loaded"),
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_submit_without_goterms_is_empty() {
    let service = spawn_server().await;
    let submission = Submission::new("no terms", sample_metadata());
    assert!(service.submit_text(&submission).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_smart_extract_uploads_pdf() {
    let service = spawn_server().await;
    let result = service
        .smart_extract(b"%PDF-1.4 fake".to_vec(), "paper.pdf", "ABC1-b")
        .await
        .unwrap();
    assert_eq!(result, "paper.pdf|application/pdf|13 for ABC1-b");
}

#[tokio::test]
async fn test_pubmed_search() {
    let service = spawn_server().await;
    let search = service.pubmed_search("ABC1 cardiomyocyte").await.unwrap();
    assert_eq!(search.message, "Search completed");
    assert_eq!(search.result.total_found, 2);
    assert_eq!(search.result.combined_text(), "first abstract second abstract");
}

#[tokio::test]
async fn test_pubmed_failure_uses_default_message() {
    let service = spawn_server().await;
    match service.pubmed_search("fail").await {
        Err(ServiceError::Api { status, message }) => {
            assert_eq!(status, 502);
            assert_eq!(message, "PubMed search failed");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}
