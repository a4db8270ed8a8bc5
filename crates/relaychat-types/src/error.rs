use thiserror::Error;

use crate::llm::LlmError;

/// Local rejection of a submission. Never reaches the network.
///
/// The `Display` text is what the client shows to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Empty or whitespace-only input.
    #[error("Please enter a message.")]
    Validation,

    /// Input longer than the configured maximum (counted in characters).
    #[error("Message is too long. Maximum length is {max} characters.")]
    Length { max: usize, actual: usize },
}

/// Outcome of a failed exchange with the relay.
///
/// Timeout, connection failure and server rejection are kept apart because
/// each needs different guidance for the user. The `Display` text is the
/// user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    /// The relay did not answer within the configured window.
    #[error("Request timed out. Please try again.")]
    Timeout { after_ms: u64 },

    /// No relay could be reached.
    #[error("Unable to connect to the server. Please check that the relay is running.")]
    Connection { reason: String },

    /// The relay answered with a non-success status.
    #[error("{message} (Status: {status})")]
    Server { status: u16, message: String },

    /// The exchange was cancelled before it finished.
    #[error("Request was cancelled.")]
    Cancelled,
}

impl ExchangeError {
    /// Short machine-readable kind, used in logs and `--json` output.
    pub fn kind(&self) -> &'static str {
        match self {
            ExchangeError::Timeout { .. } => "timeout",
            ExchangeError::Connection { .. } => "connection",
            ExchangeError::Server { .. } => "server",
            ExchangeError::Cancelled => "cancelled",
        }
    }

    /// HTTP status of a server-reported failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            ExchangeError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors raised by the relay while handling `POST /chat`.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The request body failed validation.
    #[error("{0}")]
    InvalidMessage(String),

    /// No upstream provider is configured (e.g. missing API key).
    #[error("AI provider not available")]
    ProviderUnavailable,

    /// The upstream provider call failed.
    #[error("upstream error: {0}")]
    Upstream(#[from] LlmError),
}

/// Invalid relay or client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown AI provider '{0}' (expected openai, gemini or mistral)")]
    UnknownProvider(String),

    #[error("invalid relay URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("could not build HTTP client: {0}")]
    HttpClient(String),
}
