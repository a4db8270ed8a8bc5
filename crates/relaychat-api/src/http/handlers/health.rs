//! GET /health - provider availability.

use axum::extract::State;
use axum::Json;

use relaychat_types::chat::HealthResponse;

use crate::state::AppState;

/// GET /health
///
/// Always 200; `status` says whether an upstream provider is configured.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    tracing::debug!("health check");
    Json(state.relay.health())
}
