//! Request orchestration: fetch → normalize → featurize → summarize → prompt → model.
//!
//! Everything here is per call. "No data" is `Ok(None)`; store and model
//! failures propagate as errors for the delivery layer to map.

use anyhow::Result;

use crate::features::{build_features, render_compact, FeatureRecord};
use crate::history::{self, time_ordered};
use crate::llm::TextGenerator;
use crate::models::{LatestSnapshot, NormalizedSample};
use crate::normalize::{normalize, normalize_latest};
use crate::prompt;
use crate::store::TelemetryStore;

// ---

/// Current snapshot plus the node's normalized history.
#[derive(Debug, Clone)]
pub struct NodeReadings {
    pub latest: LatestSnapshot,
    pub history: Vec<NormalizedSample>,
}

/// Everything gathered for a node before the model is called.
#[derive(Debug, Clone)]
pub struct PreparedPrompt {
    pub features: FeatureRecord,
    pub compact: String,
    /// Digest line, present when history was requested.
    pub history_summary: Option<String>,
    pub prompt: String,
}

/// Result of one advice request.
#[derive(Debug, Clone)]
pub struct Advice {
    pub answer: String,
    pub features: FeatureRecord,
    pub compact: String,
    pub history_summary: Option<String>,
}

/// The newest timestamped history sample, standing in for a missing `latest`.
pub fn promote_latest(history: &[NormalizedSample]) -> Option<LatestSnapshot> {
    time_ordered(history)
        .last()
        .map(|(_, s)| LatestSnapshot::from_sample(**s))
}

async fn fetch_history<S: TelemetryStore>(store: &S, uid: &str) -> Result<Vec<NormalizedSample>> {
    // ---
    let raw = store.history(uid).await?;
    Ok(raw.iter().map(normalize).collect())
}

/// Latest snapshot for `uid`, falling back to the newest history sample.
pub async fn load_snapshot<S: TelemetryStore>(store: &S, uid: &str) -> Result<Option<LatestSnapshot>> {
    // ---
    if let Some(raw) = store.latest(uid).await? {
        return Ok(Some(normalize_latest(&raw)));
    }

    tracing::debug!("Node {} has no latest record, trying history", uid);
    let history = fetch_history(store, uid).await?;
    Ok(promote_latest(&history))
}

/// Latest snapshot and full history for `uid`.
pub async fn load_readings<S: TelemetryStore>(store: &S, uid: &str) -> Result<Option<NodeReadings>> {
    // ---
    let latest = store.latest(uid).await?.map(|raw| normalize_latest(&raw));
    let history = fetch_history(store, uid).await?;

    let latest = match latest.or_else(|| promote_latest(&history)) {
        Some(latest) => latest,
        None => return Ok(None),
    };

    Ok(Some(NodeReadings { latest, history }))
}

/// Fetch, featurize and render the prompt for one node.
///
/// With `history_limit` set, the prompt also carries the history digest over
/// that many most recent samples.
pub async fn prepare<S: TelemetryStore>(
    store: &S,
    uid: &str,
    question: &str,
    history_limit: Option<i64>,
) -> Result<Option<PreparedPrompt>> {
    // ---
    let (latest, history_summary) = match history_limit {
        Some(limit) => match load_readings(store, uid).await? {
            Some(readings) => (
                readings.latest,
                Some(history::summarize(&readings.history, limit)),
            ),
            None => return Ok(None),
        },
        None => match load_snapshot(store, uid).await? {
            Some(latest) => (latest, None),
            None => return Ok(None),
        },
    };

    let features = build_features(&latest);
    let compact = render_compact(&features);

    let prompt = match &history_summary {
        Some(summary) => prompt::render_with_history(&compact, summary, question),
        None => prompt::render_snapshot(&compact, question),
    };

    Ok(Some(PreparedPrompt {
        features,
        compact,
        history_summary,
        prompt,
    }))
}

impl PreparedPrompt {
    // ---
    /// Hand the prompt to the model.
    pub async fn ask<G: TextGenerator>(self, llm: &G) -> Result<Advice> {
        // ---
        let answer = llm.generate(&self.prompt).await?;
        Ok(Advice {
            answer,
            features: self.features,
            compact: self.compact,
            history_summary: self.history_summary,
        })
    }
}

/// Run the whole advice pipeline for one node.
pub async fn advise<S, G>(
    store: &S,
    llm: &G,
    uid: &str,
    question: &str,
    history_limit: Option<i64>,
) -> Result<Option<Advice>>
where
    S: TelemetryStore,
    G: TextGenerator,
{
    // ---
    let Some(prepared) = prepare(store, uid, question, history_limit).await? else {
        return Ok(None);
    };

    tracing::info!("Requesting advice for node {}", uid);
    prepared.ask(llm).await.map(Some)
}
