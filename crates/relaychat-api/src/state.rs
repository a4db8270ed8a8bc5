//! Application state shared by all relay handlers.

use std::sync::Arc;
use std::time::Duration;

use relaychat_core::relay::{RelayService, RelaySettings};
use relaychat_infra::llm::{create_provider, resolve_api_key};
use relaychat_types::error::ConfigError;
use relaychat_types::llm::ProviderType;

use crate::cli::ServeArgs;

/// Shared relay state. Immutable once built, so cloning per request is cheap.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<RelayService>,
}

impl AppState {
    pub fn new(relay: RelayService) -> Self {
        Self {
            relay: Arc::new(relay),
        }
    }

    /// Build the relay from `serve` arguments and the API key in the environment.
    ///
    /// A missing key is not an error: the relay starts and answers 503.
    pub fn from_serve_args(args: &ServeArgs) -> Result<Self, ConfigError> {
        let provider_type: ProviderType = args
            .provider
            .parse()
            .map_err(|_| ConfigError::UnknownProvider(args.provider.clone()))?;

        let api_key = resolve_api_key(|name| std::env::var(name).ok());
        let provider = create_provider(
            provider_type,
            api_key,
            args.base_url.as_deref(),
            args.model.as_deref(),
        );

        let settings = RelaySettings {
            max_message_length: args.max_length,
            upstream_timeout: Duration::from_secs(args.upstream_timeout_secs),
            provider_label: provider_type.to_string(),
            ..RelaySettings::default()
        };

        Ok(Self::new(RelayService::new(provider, settings)))
    }
}
