use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::status::{validate_transition_with_reason, TransitionError};

/// Proposed status change submitted by an upstream workflow.
#[derive(Debug, Clone, Deserialize)]
pub struct TransitionRequest {
    pub current: String,
    pub next: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Router exposing the status guard so callers can check an edge before writing it.
pub fn workflow_router() -> Router {
    Router::new().route("/api/v1/workflow/transitions", post(transition_handler))
}

pub(crate) async fn transition_handler(Json(request): Json<TransitionRequest>) -> Response {
    match validate_transition_with_reason(&request.current, &request.next, request.reason.as_deref())
    {
        Ok(transition) => (StatusCode::OK, Json(transition)).into_response(),
        Err(error) => {
            debug!(%error, current = %request.current, next = %request.next, "transition refused");
            let status = match error {
                TransitionError::Conflict { .. } => StatusCode::CONFLICT,
                TransitionError::UnknownStatus(_) | TransitionError::MissingReason(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
            };
            let payload = json!({ "error": error.to_string() });
            (status, Json(payload)).into_response()
        }
    }
}
