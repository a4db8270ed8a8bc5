//! Application error type mapping relay failures to HTTP responses.
//!
//! Every error body is `{"detail": "..."}`. Upstream failures are reduced to a
//! fixed, sanitized message; the raw provider error only reaches the log.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use relaychat_types::chat::ErrorResponse;
use relaychat_types::error::RelayError;
use relaychat_types::llm::LlmError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Failure reported by the relay service.
    Relay(RelayError),
    /// The request body could not be read as a `ChatRequest`.
    BadBody { status: StatusCode, detail: String },
}

impl From<RelayError> for AppError {
    fn from(e: RelayError) -> Self {
        AppError::Relay(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadBody {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl AppError {
    /// Status code and client-facing detail.
    pub fn status_and_detail(&self) -> (StatusCode, String) {
        match self {
            AppError::BadBody { status, detail } => (*status, detail.clone()),
            AppError::Relay(RelayError::InvalidMessage(msg)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, msg.clone())
            }
            AppError::Relay(RelayError::ProviderUnavailable) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "AI provider not available".to_string(),
            ),
            AppError::Relay(RelayError::Upstream(e)) => upstream_status(e),
        }
    }
}

fn upstream_status(e: &LlmError) -> (StatusCode, String) {
    let (status, detail) = match e {
        LlmError::AuthenticationFailed => (
            StatusCode::BAD_GATEWAY,
            "Upstream provider rejected the configured credentials",
        ),
        LlmError::RateLimited | LlmError::Overloaded(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Upstream provider is busy, please retry later",
        ),
        LlmError::Timeout { .. } => (StatusCode::GATEWAY_TIMEOUT, "Upstream provider timed out"),
        LlmError::Connection(_) => (StatusCode::BAD_GATEWAY, "Could not reach upstream provider"),
        LlmError::Provider { .. }
        | LlmError::Deserialization(_)
        | LlmError::InvalidRequest(_) => (StatusCode::BAD_GATEWAY, "Upstream provider error"),
    };
    (status, detail.to_string())
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = self.status_and_detail();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = ?self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), %detail, "request rejected");
        }

        (status, Json(ErrorResponse::detail(detail))).into_response()
    }
}
