//! Upstream LLM provider construction.
//!
//! The relay talks to exactly one provider, chosen by `AI_PROVIDER`. All
//! supported backends speak the OpenAI chat completions protocol, so they share
//! [`OpenAiCompatibleProvider`] and differ only in base URL and default model.

pub mod openai_compat;

use secrecy::SecretString;

use relaychat_core::llm::BoxLlmProvider;
use relaychat_types::llm::ProviderType;

use self::openai_compat::config::OpenAiCompatConfig;
use self::openai_compat::OpenAiCompatibleProvider;

/// Environment variables checked for the upstream API key, in order.
pub const API_KEY_VARS: [&str; 2] = ["AI_API_KEY", "OPENAI_API_KEY"];

/// Pick the API key from the first non-blank variable in [`API_KEY_VARS`].
///
/// `lookup` is normally `|name| std::env::var(name).ok()`.
pub fn resolve_api_key(lookup: impl Fn(&str) -> Option<String>) -> Option<SecretString> {
    API_KEY_VARS.iter().find_map(|name| {
        lookup(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(SecretString::from)
    })
}

/// Build the upstream provider.
///
/// Returns `None` when there is no API key; the relay still starts and reports
/// itself unhealthy. `base_url` and `model` override the provider defaults.
pub fn create_provider(
    provider_type: ProviderType,
    api_key: Option<SecretString>,
    base_url: Option<&str>,
    model: Option<&str>,
) -> Option<BoxLlmProvider> {
    let Some(api_key) = api_key else {
        tracing::warn!(
            provider = %provider_type,
            "no API key set (AI_API_KEY / OPENAI_API_KEY); /chat will answer 503"
        );
        return None;
    };

    let mut config = OpenAiCompatConfig::defaults(provider_type, api_key);
    if let Some(url) = base_url.map(str::trim).filter(|u| !u.is_empty()) {
        config.base_url = url.to_string();
    }
    if let Some(model) = model.map(str::trim).filter(|m| !m.is_empty()) {
        config.model = model.to_string();
    }

    tracing::info!(
        provider = %config.provider_name,
        model = %config.model,
        base_url = %config.base_url,
        "upstream provider configured"
    );
    Some(BoxLlmProvider::new(OpenAiCompatibleProvider::new(config)))
}
