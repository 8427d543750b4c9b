//! Language model client (Ollama `generate` API).

use std::future::Future;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

// ---

/// Something that turns a rendered prompt into free text.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Blocking-style client: one request, one complete answer, no retries.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    // ---
    http: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    // ---
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl TextGenerator for OllamaClient {
    // ---
    async fn generate(&self, prompt: &str) -> Result<String> {
        // ---
        let url = format!("{}/api/generate", self.base_url);
        tracing::debug!(
            "Calling model {} at {} ({} prompt bytes)",
            self.model,
            url,
            prompt.len()
        );

        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let reply: GenerateResponse = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("LLM request to {} failed", url))?
            .error_for_status()
            .with_context(|| format!("LLM at {} returned an error", url))?
            .json()
            .await
            .with_context(|| format!("LLM response from {} is malformed", url))?;

        tracing::info!("Model {} answered ({} bytes)", self.model, reply.response.len());
        Ok(reply.response)
    }
}
