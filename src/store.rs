//! Realtime database client for per-node telemetry.
//!
//! Reads go through the RTDB REST interface:
//! - `GET {base}/nodes/{uid}/latest.json`  → one raw record or `null`
//! - `GET {base}/nodes/{uid}/history.json` → push-key map of raw records
//!
//! The client is built once at startup and handed to whatever needs it.

use std::future::Future;

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde_json::Value;

use crate::models::RawSample;

// ---

/// Read access to a node's telemetry.
pub trait TelemetryStore {
    /// The `latest` record, or `None` when the node has none.
    fn latest(&self, uid: &str) -> impl Future<Output = Result<Option<RawSample>>> + Send;

    /// Every history record, in store key order.
    fn history(&self, uid: &str) -> impl Future<Output = Result<Vec<RawSample>>> + Send;
}

/// Node ids become path segments, so RTDB's reserved key characters are refused.
pub fn is_valid_uid(uid: &str) -> bool {
    !uid.is_empty()
        && !uid
            .chars()
            .any(|c| matches!(c, '/' | '.' | '#' | '$' | '[' | ']') || c.is_control())
}

/// REST client for a Firebase realtime database.
#[derive(Debug, Clone)]
pub struct RtdbClient {
    // ---
    http: Client,
    base_url: String,
    auth: Option<String>,
}

impl RtdbClient {
    // ---
    pub fn new(base_url: &str, auth: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        }
    }

    async fn get_node(&self, uid: &str, leaf: &str) -> Result<Value> {
        // ---
        if !is_valid_uid(uid) {
            return Err(anyhow!("Invalid node id: {:?}", uid));
        }

        let url = format!("{}/nodes/{}/{}.json", self.base_url, uid, leaf);
        tracing::debug!("Fetching {}", url);

        let mut request = self.http.get(&url);
        if let Some(token) = &self.auth {
            request = request.query(&[("auth", token)]);
        }

        let value = request
            .send()
            .await
            .with_context(|| format!("RTDB request to {} failed", url))?
            .error_for_status()
            .with_context(|| format!("RTDB returned an error for {}", url))?
            .json::<Value>()
            .await
            .with_context(|| format!("RTDB response from {} is not JSON", url))?;

        Ok(value)
    }
}

impl TelemetryStore for RtdbClient {
    // ---
    async fn latest(&self, uid: &str) -> Result<Option<RawSample>> {
        // ---
        let value = self.get_node(uid, "latest").await?;
        Ok(parse_latest(value))
    }

    async fn history(&self, uid: &str) -> Result<Vec<RawSample>> {
        // ---
        let value = self.get_node(uid, "history").await?;
        let samples = parse_history(value);
        tracing::debug!("Node {} history has {} records", uid, samples.len());
        Ok(samples)
    }
}

/// A non-empty JSON object becomes a record; anything else means "no latest".
pub fn parse_latest(value: Value) -> Option<RawSample> {
    // ---
    let is_record = value.as_object().is_some_and(|map| !map.is_empty());
    if !is_record {
        return None;
    }
    serde_json::from_value(value).ok()
}

/// Flatten a history node into records.
///
/// RTDB returns push-key maps as objects, and integer-keyed maps as arrays
/// with `null` holes. Entries that are not objects are skipped.
pub fn parse_history(value: Value) -> Vec<RawSample> {
    // ---
    let entries: Vec<Value> = match value {
        Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        Value::Array(items) => items,
        _ => return Vec::new(),
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| {
            if !entry.is_object() {
                if !entry.is_null() {
                    tracing::debug!("Skipping history entry {}: not an object: {}", i, entry);
                }
                return None;
            }
            serde_json::from_value::<RawSample>(entry).ok()
        })
        .collect()
}
