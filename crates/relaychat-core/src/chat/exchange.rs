//! Cancellable request/response exchange with the relay.
//!
//! [`RelayTransport`] is the port the HTTP client implements. [`run_exchange`]
//! wraps one call in a hard timeout and a cancellation token. On every exit
//! path the transport future is dropped, which aborts the underlying
//! connection.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use relaychat_types::chat::{ChatRequest, ChatResponse};
use relaychat_types::error::ExchangeError;

/// Something that can carry a [`ChatRequest`] to the relay.
///
/// Implementations classify their own failures into
/// [`ExchangeError::Connection`] or [`ExchangeError::Server`]; timeouts and
/// cancellation are imposed from outside by [`run_exchange`].
pub trait RelayTransport: Send + Sync {
    fn send(
        &self,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, ExchangeError>> + Send;
}

/// Run a single exchange, bounded by `timeout` and `cancel`.
///
/// - transport finishes first: its result is returned unchanged
/// - `timeout` elapses first: [`ExchangeError::Timeout`]
/// - `cancel` fires first: [`ExchangeError::Cancelled`]
pub async fn run_exchange<T: RelayTransport>(
    transport: &T,
    request: &ChatRequest,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<ChatResponse, ExchangeError> {
    let started = tokio::time::Instant::now();

    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ExchangeError::Cancelled),
        result = tokio::time::timeout(timeout, transport.send(request)) => match result {
            Ok(outcome) => outcome,
            Err(_elapsed) => Err(ExchangeError::Timeout {
                after_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        },
    };

    let elapsed_ms = started.elapsed().as_millis() as u64;
    match &outcome {
        Ok(_) => tracing::debug!(elapsed_ms, "exchange completed"),
        Err(e) => tracing::warn!(kind = e.kind(), elapsed_ms, error = ?e, "exchange failed"),
    }
    outcome
}
