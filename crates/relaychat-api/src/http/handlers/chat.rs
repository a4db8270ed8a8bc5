//! POST /chat - forward one message to the upstream provider.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use relaychat_types::chat::{ChatRequest, ChatResponse};

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /chat
///
/// Body rejections are taken as a `Result` so they come back in the same
/// `{"detail": ...}` shape as every other error.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload?;
    let response = state.relay.chat(&request).await?;
    Ok(Json(response))
}
