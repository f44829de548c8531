//! HTTP surface: one router per match strategy.

use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use thiserror::Error;

use crate::models::config::{MatchStrategy, ServerConfig};
use crate::processing::embedding::{EmbeddingError, FastEmbedder};
use crate::processing::lexical::FuzzyMatcher;
use crate::processing::semantic::SemanticMatcher;
use crate::repository::{
    FileRepository, FuzzyCatalogReader, RepositoryError, SemanticCatalogReader,
};

pub mod error;
pub mod handlers;
pub mod middleware;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load catalog: {0}")]
    Repository(#[from] RepositoryError),
    #[error("failed to prepare embedder: {0}")]
    Embedding(#[from] EmbeddingError),
}

/// Routes for the embedding matcher: `/`, `/ping` (JSON) and `/amibot`.
pub fn semantic_router(matcher: Arc<SemanticMatcher>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/ping", get(handlers::ping_status))
        .route("/amibot", post(handlers::amibot))
        .layer(from_fn(middleware::log_requests))
        .with_state(matcher)
}

/// Routes for the token-set matcher: `/`, `/ping` (text) and `/ask`.
pub fn fuzzy_router(matcher: Arc<FuzzyMatcher>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/ping", get(handlers::ping_pong))
        .route("/ask", post(handlers::ask))
        .layer(from_fn(middleware::log_requests))
        .with_state(matcher)
}

/// Load the configured catalog and build its router.
///
/// Blocking: reads catalog files and may download the embedding model.
pub fn build_app(config: &ServerConfig) -> Result<Router, StartupError> {
    let repo = FileRepository::new(&config.data_dir);
    let thresholds = config.thresholds();

    match config.strategy {
        MatchStrategy::Semantic => {
            let catalog = repo.load_embedded_catalog()?;
            log::info!(
                "Loaded {} catalog variants ({}-dimensional embeddings) from {}",
                catalog.catalog().len(),
                catalog.dimension(),
                repo.data_dir().display()
            );

            let embedder =
                FastEmbedder::try_new(config.embedding_model, config.model_cache_dir.as_deref())?;
            let matcher = SemanticMatcher::new(catalog, Box::new(embedder), thresholds)?;

            Ok(semantic_router(Arc::new(matcher)))
        }
        MatchStrategy::Fuzzy => {
            let catalog = repo.load_fuzzy_catalog()?;
            log::info!(
                "Loaded {} catalog variants from {}",
                catalog.len(),
                repo.data_dir().display()
            );

            Ok(fuzzy_router(Arc::new(FuzzyMatcher::new(
                catalog,
                thresholds.token_set,
            ))))
        }
    }
}

/// Resolve on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                log::error!("Failed to listen for SIGTERM: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::info!("Received Ctrl+C, shutting down"),
        _ = terminate => log::info!("Received SIGTERM, shutting down"),
    }
}
