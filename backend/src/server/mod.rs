//! HTTP router, shared state and logging setup.

use std::sync::Arc;

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::api::search::search_repository::SearchRepository;

pub mod search_routes;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn SearchRepository>,
    pub cloudfront_url: String,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/recreation-resource/search", get(search_routes::search_recreation_resources))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Installs the global subscriber. `RUST_LOG` wins over `level` when set.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("recreation_backend={level},recreation_search_server={level}")));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
