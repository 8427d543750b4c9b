use axum::{
    extract::Query, extract::State, http::StatusCode, response::IntoResponse, response::Response,
    routing::get, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::{error_response, invalid_uid, no_data, AppState};
use crate::{digest, is_valid_uid, load_readings, HistoryDigest};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/history", get(handler))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    uid: String,
    /// Window size; defaults to the configured `HISTORY_LIMIT`.
    limit: Option<i64>,
}

#[derive(Debug, Serialize)]
struct HistoryResponse {
    /// Digest line or one of `no_history` / `insufficient_points`.
    summary: String,
    digest: Option<HistoryDigest>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
}

async fn handler(Query(params): Query<HistoryQuery>, State(state): State<AppState>) -> Response {
    // ---
    let limit = params.limit.unwrap_or(state.config.history_limit);
    info!("GET /history uid={} limit={}", params.uid, limit);

    if !is_valid_uid(&params.uid) {
        return invalid_uid();
    }

    let readings = match load_readings(&state.store, &params.uid).await {
        Ok(Some(readings)) => readings,
        Ok(None) => return no_data(),
        Err(e) => {
            error!("Failed to load history for {}: {:#}", params.uid, e);
            return error_response(StatusCode::BAD_GATEWAY, "store_unavailable");
        }
    };

    let body = match digest(&readings.history, limit) {
        Ok(d) => HistoryResponse {
            summary: d.to_string(),
            from: d.window_start(),
            to: d.window_end(),
            digest: Some(d),
        },
        Err(gap) => HistoryResponse {
            summary: gap.to_string(),
            digest: None,
            from: None,
            to: None,
        },
    };

    (StatusCode::OK, Json(body)).into_response()
}
