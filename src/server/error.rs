use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tokio::task::JoinError;

use crate::processing::embedding::EmbeddingError;

/// Errors surfaced to HTTP clients as `{"error": <message>}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No input provided")]
    NoInput,
    #[error("Empty query provided.")]
    EmptyQuery,
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
    #[error("matcher task failed: {0}")]
    Task(#[from] JoinError),
}

/// Body text for 5xx replies; the underlying error is only logged.
const INTERNAL_ERROR: &str = "Internal server error";

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoInput | ApiError::EmptyQuery => StatusCode::BAD_REQUEST,
            ApiError::Embedding(_) | ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            log::error!("Request failed: {self}");
            INTERNAL_ERROR.to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
