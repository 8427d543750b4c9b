//! Application entry point for the `sensorflow-advisor` HTTP service.
//!
//! This binary orchestrates the startup sequence for the advice API:
//! - Loading configuration from environment variables or `.env`
//! - Initializing structured logging/tracing
//! - Constructing the realtime database and model clients once
//! - Mounting all API routes via the `routes` gateway
//! - Binding the Axum HTTP server and serving requests
//!
//! # Environment Variables
//! - `RTDB_URL` (**required**) – realtime database base URL
//! - `RTDB_AUTH` (optional) – database auth token
//! - `OLLAMA_URL` / `OLLAMA_MODEL` (optional) – model endpoint and name
//! - `HISTORY_LIMIT` (optional) – default history window (default: 48)
//! - `SERVER_PORT` (optional) – listen port (default: 8000)
//! - `SENSORFLOW_LOG_LEVEL` (optional) – log verbosity (default: `debug`)
//! - `SENSORFLOW_SPAN_EVENTS` (optional) – span event mode for tracing
use std::net::SocketAddr;

use anyhow::Result;
use axum::Router;
use dotenvy::dotenv;

use sensorflow_advisor::{config, init_tracing, routes, AppState};

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    dotenv().ok();
    init_tracing("debug");

    let cfg = config::load_from_env()?;
    cfg.log_config();

    let port = cfg.port;
    let state = AppState::from_config(cfg);

    // Build app from routes gateway
    let app: Router = routes::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
