//! LlmProvider trait definition.

use relaychat_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for upstream LLM backends.
///
/// Implementations live in relaychat-infra (e.g. `OpenAiCompatibleProvider`).
/// They are responsible for mapping their own failures onto [`LlmError`] so the
/// relay can pick the right status code.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "openai", "gemini").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
