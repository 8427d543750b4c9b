// src/routes/health.rs
//! API health check endpoint.
//!
//! Sibling module in the `routes` directory; the gateway (`mod.rs`) merges
//! its subrouter so `main.rs` does not need to know about individual
//! endpoints.

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
}

/// Handle `GET /health`.
///
/// Does not touch the realtime database or the model.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// Create a subrouter containing the `/health` route.
///
/// Generic over the application state so it merges cleanly with the gateway
/// router.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health))
}
