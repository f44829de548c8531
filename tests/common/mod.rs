//! Helpers for integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use amibot::models::config::MatchThresholds;
use amibot::processing::embedding::{Embedder, EmbeddingError};
use amibot::processing::lexical::FuzzyMatcher;
use amibot::processing::semantic::SemanticMatcher;
use amibot::repository::{
    EMBEDDINGS_FILE, FIELD_MAP_FILE, FIELD_VARIANTS_FILE, FileRepository, FuzzyCatalogReader,
    QUERY_LIST_FILE, SemanticCatalogReader, VARIANT_RESPONSES_FILE,
};
use amibot::server::{fuzzy_router, semantic_router};
use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

/// Catalog files written to a temporary data directory.
pub struct TestCatalog {
    dir: TempDir,
}

impl TestCatalog {
    fn empty() -> Self {
        TestCatalog {
            dir: tempfile::tempdir().expect("Failed to create temporary data dir."),
        }
    }

    /// Three variants with 4-dimensional rows; the fourth axis is left free
    /// for text the embedder does not know.
    pub fn semantic() -> Self {
        let catalog = Self::empty();
        catalog.write_json(
            QUERY_LIST_FILE,
            json!(["What is the deadline?", "How do I register?", "Where is the library?"]),
        );
        catalog.write_json(
            VARIANT_RESPONSES_FILE,
            json!({
                "What is the deadline?": "Deadlines are posted on the portal.",
                "How do I register?": "Register at the student office.",
                "Where is the library?": "The library is in building C.",
            }),
        );
        let rows: [f32; 12] = [
            2.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 0.5, 0.0,
        ];
        fs::write(
            catalog.path().join(EMBEDDINGS_FILE),
            bytemuck::cast_slice::<f32, u8>(&rows),
        )
        .expect("Failed to write embeddings.");
        catalog
    }

    pub fn fuzzy() -> Self {
        let catalog = Self::empty();
        catalog.write_json(
            FIELD_VARIANTS_FILE,
            json!(["library hours", "exam schedule", "fee payment", "library hours"]),
        );
        catalog.write_json(
            FIELD_MAP_FILE,
            json!({
                "library hours": "The library is open 8am to 10pm.",
                "exam schedule": "Exams start on May 12.",
                "fee payment": "Fees are paid through the portal.",
            }),
        );
        catalog
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    fn write_json(&self, name: &str, value: Value) {
        fs::write(self.path().join(name), value.to_string()).expect("Failed to write fixture.");
    }
}

/// Deterministic stand-in for the ONNX model.
pub struct KeywordEmbedder;

impl Embedder for KeywordEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(match text {
            "what is the deadline" => vec![1.0, 0.0, 0.0, 0.0],
            "how do i register" => vec![0.0, 1.0, 0.0, 0.0],
            "where is the library" => vec![0.0, 0.0, 1.0, 0.0],
            "submission due date" => vec![0.9, 0.1, 0.0, 0.0],
            _ => vec![0.0, 0.0, 0.0, 1.0],
        })
    }
}

/// Answers the startup dimension check, then fails every inference.
#[derive(Default)]
pub struct BrokenEmbedder {
    calls: AtomicUsize,
}

impl Embedder for BrokenEmbedder {
    fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            return Ok(vec![1.0, 0.0, 0.0, 0.0]);
        }
        Err(EmbeddingError::Inference(
            "/var/cache/amibot/model.onnx: session run failed".to_string(),
        ))
    }
}

pub fn semantic_app(catalog: &TestCatalog) -> Router {
    semantic_app_with(catalog, Box::new(KeywordEmbedder))
}

pub fn semantic_app_with(catalog: &TestCatalog, embedder: Box<dyn Embedder>) -> Router {
    let catalog = FileRepository::new(catalog.path())
        .load_embedded_catalog()
        .expect("Failed to load semantic catalog.");
    let matcher = SemanticMatcher::new(catalog, embedder, MatchThresholds::default())
        .expect("Embedder and catalog dimensions differ.");
    semantic_router(Arc::new(matcher))
}

pub fn fuzzy_app(catalog: &TestCatalog) -> Router {
    let catalog = FileRepository::new(catalog.path())
        .load_fuzzy_catalog()
        .expect("Failed to load fuzzy catalog.");
    fuzzy_router(Arc::new(FuzzyMatcher::new(
        catalog,
        MatchThresholds::default().token_set,
    )))
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request.")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri)
        .body(Body::empty())
        .expect("Failed to build request.")
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Bytes) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Router is infallible.");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body.")
        .to_bytes();
    (status, body)
}

pub async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    let value = serde_json::from_slice(&body).expect("Body is not JSON.");
    (status, value)
}
