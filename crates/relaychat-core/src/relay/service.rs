//! Relay service behind `POST /chat` and `GET /health`.
//!
//! Stateless: every call builds a fresh single-turn completion request. The
//! service holds only immutable settings and an optional provider, so one
//! instance is shared across all requests behind an `Arc`.

use std::time::Duration;

use relaychat_types::chat::{timestamp_now, ChatRequest, ChatResponse, HealthResponse, HealthStatus};
use relaychat_types::config::DEFAULT_MAX_MESSAGE_LENGTH;
use relaychat_types::error::RelayError;
use relaychat_types::llm::{CompletionRequest, LlmError};

use crate::llm::BoxLlmProvider;

/// Characters of user text and reply that may appear in a log line.
const LOG_PREVIEW_CHARS: usize = 50;

/// Fixed parameters for every upstream call.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub max_message_length: usize,
    pub system_prompt: String,
    pub max_tokens: u32,
    pub temperature: f64,
    /// Model requested upstream; empty defers to the provider's default.
    pub model: String,
    pub upstream_timeout: Duration,
    /// Provider name reported by `/health`, even when no provider could be built.
    pub provider_label: String,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
            system_prompt: "You are a helpful assistant.".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
            model: String::new(),
            upstream_timeout: Duration::from_secs(60),
            provider_label: "openai".to_string(),
        }
    }
}

/// Forwards single chat messages to the upstream provider.
#[derive(Debug)]
pub struct RelayService {
    provider: Option<BoxLlmProvider>,
    settings: RelaySettings,
}

impl RelayService {
    /// `provider` is `None` when no API key was configured; `chat` then fails
    /// with [`RelayError::ProviderUnavailable`].
    pub fn new(provider: Option<BoxLlmProvider>, settings: RelaySettings) -> Self {
        Self { provider, settings }
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    /// Check an incoming message and return its trimmed text.
    ///
    /// The length limit applies to the message as received, surrounding
    /// whitespace included; emptiness is judged after trimming.
    pub fn validate<'a>(&self, message: &'a str) -> Result<&'a str, RelayError> {
        let max = self.settings.max_message_length;
        if message.chars().count() > max {
            return Err(RelayError::InvalidMessage(format!(
                "Message must be at most {max} characters"
            )));
        }
        let trimmed = message.trim();
        if trimmed.is_empty() {
            return Err(RelayError::InvalidMessage(
                "Message must not be empty".to_string(),
            ));
        }
        Ok(trimmed)
    }

    /// Ask the upstream provider for a reply to `text`.
    ///
    /// The call is bounded by `upstream_timeout`; running out of time is
    /// reported as [`LlmError::Timeout`].
    pub async fn generate(&self, text: &str) -> Result<String, RelayError> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(RelayError::ProviderUnavailable)?;

        let mut request =
            CompletionRequest::single_turn(text, Some(self.settings.system_prompt.clone()));
        request.model = self.settings.model.clone();
        request.max_tokens = self.settings.max_tokens;
        request.temperature = Some(self.settings.temperature);

        let timeout = self.settings.upstream_timeout;
        let response = match tokio::time::timeout(timeout, provider.complete(&request)).await {
            Ok(result) => result?,
            Err(_elapsed) => {
                return Err(LlmError::Timeout {
                    after_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                }
                .into());
            }
        };

        Ok(response.content.trim().to_string())
    }

    /// Handle one chat message end to end.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, RelayError> {
        let text = self.validate(&request.message)?;
        tracing::info!(message = %preview(text), "chat request");

        match self.generate(text).await {
            Ok(reply) => {
                tracing::info!(reply = %preview(&reply), "chat reply");
                Ok(ChatResponse {
                    response: reply,
                    timestamp: Some(timestamp_now()),
                })
            }
            Err(e) => {
                tracing::error!(error = %e, provider = %self.settings.provider_label, "upstream call failed");
                Err(e)
            }
        }
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: if self.is_available() {
                HealthStatus::Healthy
            } else {
                HealthStatus::Unhealthy
            },
            timestamp: timestamp_now(),
            ai_provider: self.settings.provider_label.clone(),
        }
    }
}

/// First [`LOG_PREVIEW_CHARS`] characters of `text`.
fn preview(text: &str) -> &str {
    match text.char_indices().nth(LOG_PREVIEW_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
