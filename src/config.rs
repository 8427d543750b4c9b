//! Configuration loader for the `sensorflow-advisor` service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). By consolidating configuration logic here, we
//! avoid scattering `env::var` calls throughout the codebase.
//!
use std::env;

use anyhow::{anyhow, Result};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";
pub const DEFAULT_HISTORY_LIMIT: i64 = 48;

/// Parse an optional environment variable of type `$ty` with a default value.
macro_rules! parse_env {
    ($var_name:expr, $ty:ty, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.trim().parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse a required string environment variable.
macro_rules! require_env {
    ($var_name:expr) => {
        env::var($var_name)
            .map_err(|_| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Realtime database base URL.
    pub rtdb_url: String,

    /// Optional RTDB auth token, sent as the `auth` query parameter.
    pub rtdb_auth: Option<String>,

    /// Ollama base URL.
    pub ollama_url: String,

    /// Model name passed to Ollama.
    pub ollama_model: String,

    /// Default history window size; `<= 0` keeps every sample.
    pub history_limit: i64,

    /// HTTP listen port.
    pub port: u16,
}

/// Load configuration from environment variables with defaults.
///
/// Required:
/// - `RTDB_URL` – realtime database base URL
///
/// Optional:
/// - `RTDB_AUTH` – database auth token (default: none)
/// - `OLLAMA_URL` – Ollama base URL (default: `http://localhost:11434`)
/// - `OLLAMA_MODEL` – model name (default: `llama3.2`)
/// - `HISTORY_LIMIT` – history window size (default: 48)
/// - `SERVER_PORT` – listen port (default: 8000)
///
/// Returns an error if any required variable is missing or invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let rtdb_url = require_env!("RTDB_URL");
    let rtdb_auth = env::var("RTDB_AUTH").ok().filter(|t| !t.is_empty());
    let ollama_url = env::var("OLLAMA_URL").unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string());
    let ollama_model =
        env::var("OLLAMA_MODEL").unwrap_or_else(|_| DEFAULT_OLLAMA_MODEL.to_string());
    let history_limit = parse_env!("HISTORY_LIMIT", i64, DEFAULT_HISTORY_LIMIT);
    let port = parse_env!("SERVER_PORT", u16, 8000);

    Ok(Config {
        rtdb_url,
        rtdb_auth,
        ollama_url,
        ollama_model,
        history_limit,
        port,
    })
}

/// Mask a secret, keeping only its last four characters.
pub fn mask_secret(secret: &str) -> String {
    // ---
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    ///
    /// Masks the database auth token while showing all other values.
    pub fn log_config(&self) {
        // ---
        let masked_auth = self
            .rtdb_auth
            .as_deref()
            .map(mask_secret)
            .unwrap_or_else(|| "<none>".to_string());

        tracing::info!("Configuration loaded:");
        tracing::info!("  RTDB_URL      : {}", self.rtdb_url);
        tracing::info!("  RTDB_AUTH     : {}", masked_auth);
        tracing::info!("  OLLAMA_URL    : {}", self.ollama_url);
        tracing::info!("  OLLAMA_MODEL  : {}", self.ollama_model);
        tracing::info!("  HISTORY_LIMIT : {}", self.history_limit);
        tracing::info!("  SERVER_PORT   : {}", self.port);
    }
}
