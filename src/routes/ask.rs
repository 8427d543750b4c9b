use axum::{
    extract::State, http::StatusCode, response::IntoResponse, response::Response, routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::{error_response, invalid_uid, no_data, AppState};
use crate::{is_valid_uid, prepare, FeatureRecord};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/ask", post(handler))
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    uid: String,
    user_question: String,
    /// When set, the prompt also carries the history digest.
    history_limit: Option<i64>,
}

#[derive(Debug, Serialize)]
struct AskResponse {
    answer: String,
    readings: FeatureRecord,
}

async fn handler(State(state): State<AppState>, Json(body): Json<AskRequest>) -> Response {
    // ---
    info!("POST /ask uid={}", body.uid);

    if !is_valid_uid(&body.uid) {
        return invalid_uid();
    }

    let prepared = match prepare(
        &state.store,
        &body.uid,
        &body.user_question,
        body.history_limit,
    )
    .await
    {
        Ok(Some(prepared)) => prepared,
        Ok(None) => return no_data(),
        Err(e) => {
            error!("Failed to load readings for {}: {:#}", body.uid, e);
            return error_response(StatusCode::BAD_GATEWAY, "store_unavailable");
        }
    };

    match prepared.ask(&state.llm).await {
        Ok(advice) => {
            let response = AskResponse {
                answer: advice.answer,
                readings: advice.features,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Model call for {} failed: {:#}", body.uid, e);
            error_response(StatusCode::BAD_GATEWAY, "llm_unavailable")
        }
    }
}
