use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::domain::reply::{FuzzyReply, SemanticReply};
use crate::processing::lexical::FuzzyMatcher;
use crate::processing::normalize::normalize;
use crate::processing::semantic::SemanticMatcher;
use crate::server::error::ApiError;

/// Body of `POST /amibot`.
#[derive(Debug, Default, Deserialize)]
pub struct AmibotRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /ask`.
#[derive(Debug, Default, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub query: Option<String>,
}

/// Keep the text only when it has something besides whitespace.
fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|value| !value.trim().is_empty())
}

/// Unreadable bodies are treated like an absent field.
fn body_or_default<T: Default>(payload: Result<Json<T>, JsonRejection>) -> T {
    match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            log::debug!("Rejected request body: {rejection}");
            T::default()
        }
    }
}

pub async fn root() -> &'static str {
    "AmiBot is up and running"
}

pub async fn ping_status() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "AmiBot is alive" }))
}

pub async fn ping_pong() -> &'static str {
    "pong"
}

/// Answer a message with the embedding matcher.
pub async fn amibot(
    State(matcher): State<Arc<SemanticMatcher>>,
    payload: Result<Json<AmibotRequest>, JsonRejection>,
) -> Result<Json<SemanticReply>, ApiError> {
    let message = non_blank(body_or_default(payload).message).ok_or(ApiError::NoInput)?;
    let cleaned = normalize(&message);

    // Model inference is CPU bound; keep it off the async workers.
    let reply = tokio::task::spawn_blocking(move || matcher.reply(&cleaned)).await??;

    Ok(Json(reply))
}

/// Answer a query with the token-set matcher.
pub async fn ask(
    State(matcher): State<Arc<FuzzyMatcher>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<FuzzyReply>, ApiError> {
    let query = non_blank(body_or_default(payload).query).ok_or(ApiError::EmptyQuery)?;

    Ok(Json(matcher.reply(&normalize(&query))))
}
