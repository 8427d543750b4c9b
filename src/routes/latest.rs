use axum::{
    extract::Query, extract::State, http::StatusCode, response::IntoResponse, response::Response,
    routing::get, Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::{error_response, invalid_uid, no_data, AppState};
use crate::{build_features, is_valid_uid, load_snapshot, render_compact, FeatureRecord};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/latest", get(handler))
}

#[derive(Debug, Deserialize)]
pub struct LatestQuery {
    uid: String,
}

#[derive(Debug, Serialize)]
struct LatestResponse {
    features: FeatureRecord,
    compact: String,
}

async fn handler(Query(params): Query<LatestQuery>, State(state): State<AppState>) -> Response {
    // ---
    info!("GET /latest uid={}", params.uid);

    if !is_valid_uid(&params.uid) {
        return invalid_uid();
    }

    let snapshot = match load_snapshot(&state.store, &params.uid).await {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => return no_data(),
        Err(e) => {
            error!("Failed to load snapshot for {}: {:#}", params.uid, e);
            return error_response(StatusCode::BAD_GATEWAY, "store_unavailable");
        }
    };

    let features = build_features(&snapshot);
    let compact = render_compact(&features);
    (StatusCode::OK, Json(LatestResponse { features, compact })).into_response()
}
