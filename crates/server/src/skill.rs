use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use mathwhiz_skill::{DispatchError, RequestEnvelope, ResponseEnvelope, SkillDispatcher};
use serde::Serialize;

#[derive(Clone)]
pub struct SkillState {
    dispatcher: Arc<SkillDispatcher>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkillErrorBody {
    pub error: String,
}

pub fn router(dispatcher: Arc<SkillDispatcher>) -> Router {
    Router::new().route("/skill", post(handle_request)).with_state(SkillState { dispatcher })
}

/// Request/response bridge for the voice platform. Skill failures come back as spoken
/// replies; only an unexpected caller is refused.
pub async fn handle_request(
    State(state): State<SkillState>,
    Json(envelope): Json<RequestEnvelope>,
) -> Result<Json<ResponseEnvelope>, (StatusCode, Json<SkillErrorBody>)> {
    state.dispatcher.respond(&envelope).map(Json).map_err(|error| {
        let status = match error {
            DispatchError::ApplicationMismatch { .. } => StatusCode::FORBIDDEN,
            DispatchError::Skill(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(SkillErrorBody { error: error.to_string() }))
    })
}
