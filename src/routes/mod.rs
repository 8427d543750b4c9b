use axum::{http::StatusCode, response::IntoResponse, response::Response, Json, Router};
use serde_json::json;

use crate::{Config, OllamaClient, RtdbClient};

mod ask;
mod health;
mod history;
mod latest;

// ---

/// Shared per-process handles. Cloned into every request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: RtdbClient,
    pub llm: OllamaClient,
    pub config: Config,
}

impl AppState {
    // ---
    pub fn from_config(config: Config) -> Self {
        Self {
            store: RtdbClient::new(&config.rtdb_url, config.rtdb_auth.clone()),
            llm: OllamaClient::new(&config.ollama_url, &config.ollama_model),
            config,
        }
    }
}

pub fn router(state: AppState) -> Router {
    // ---
    Router::new()
        .merge(latest::router())
        .merge(history::router())
        .merge(ask::router())
        .merge(health::router())
        .with_state(state)
}

/// `{"error": <code>}` with the given status.
fn error_response(status: StatusCode, code: &str) -> Response {
    (status, Json(json!({ "error": code }))).into_response()
}

fn no_data() -> Response {
    error_response(StatusCode::NOT_FOUND, "no_data")
}

fn invalid_uid() -> Response {
    error_response(StatusCode::BAD_REQUEST, "invalid_uid")
}
