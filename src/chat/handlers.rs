use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

pub fn chat_routes() -> Router<AppState> {
    Router::new().route("/chat/assistant", post(assistant))
}

#[instrument(skip(state, auth, payload), fields(user_id = %auth.id))]
pub async fn assistant(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let Json(payload) = payload?;
    let message = payload.message.trim();
    if message.is_empty() {
        return Err(AppError::validation("message is required"));
    }

    let reply = state
        .chat
        .complete(message)
        .await
        .map_err(AppError::Upstream)?;
    Ok(Json(ChatResponse { reply }))
}
