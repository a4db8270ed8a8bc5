//! Per-provider defaults for OpenAI-compatible backends.

use secrecy::SecretString;

use relaychat_types::llm::ProviderType;

/// Configuration for an [`super::OpenAiCompatibleProvider`].
///
/// No `Debug`: it holds the API key.
pub struct OpenAiCompatConfig {
    /// Provider name reported in logs and `/health` (e.g. "openai").
    pub provider_name: String,
    /// Base URL for the API (e.g. "https://api.openai.com/v1").
    pub base_url: String,
    pub api_key: SecretString,
    /// Model used when the request does not name one.
    pub model: String,
}

impl OpenAiCompatConfig {
    pub fn defaults(provider_type: ProviderType, api_key: SecretString) -> Self {
        match provider_type {
            ProviderType::OpenAi => openai_defaults(api_key),
            ProviderType::Gemini => gemini_defaults(api_key),
            ProviderType::Mistral => mistral_defaults(api_key),
        }
    }
}

/// OpenAI. Base URL: `https://api.openai.com/v1`
pub fn openai_defaults(api_key: SecretString) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: "https://api.openai.com/v1".into(),
        api_key,
        model: "gpt-3.5-turbo".into(),
    }
}

/// Google Gemini through its OpenAI-compatible endpoint.
///
/// Base URL: `https://generativelanguage.googleapis.com/v1beta/openai`
pub fn gemini_defaults(api_key: SecretString) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "gemini".into(),
        base_url: "https://generativelanguage.googleapis.com/v1beta/openai".into(),
        api_key,
        model: "gemini-2.0-flash".into(),
    }
}

/// Mistral AI. Base URL: `https://api.mistral.ai/v1`
pub fn mistral_defaults(api_key: SecretString) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "mistral".into(),
        base_url: "https://api.mistral.ai/v1".into(),
        api_key,
        model: "mistral-small-latest".into(),
    }
}
