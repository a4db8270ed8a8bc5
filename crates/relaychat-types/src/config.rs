//! Client configuration types for relaychat.
//!
//! `ClientConfig` is fixed at start-up (config file, then CLI flags); nothing
//! in it is negotiated with the relay at runtime.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default maximum message length, in characters.
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 1000;

/// Settings for one chat client session.
///
/// Loaded from `~/.relaychat/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the relay (e.g. `http://localhost:8000`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Longest accepted message, in characters.
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,

    /// Hard timeout for one exchange with the relay.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// How long an error stays visible before it is cleared.
    #[serde(default = "default_error_display_ms")]
    pub error_display_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_max_message_length() -> usize {
    DEFAULT_MAX_MESSAGE_LENGTH
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_error_display_ms() -> u64 {
    5_000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            max_message_length: default_max_message_length(),
            request_timeout_ms: default_request_timeout_ms(),
            error_display_ms: default_error_display_ms(),
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn error_display(&self) -> Duration {
        Duration::from_millis(self.error_display_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default_values() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.max_message_length, 1000);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.error_display(), Duration::from_secs(5));
    }

    #[test]
    fn test_client_config_partial_toml() {
        let config: ClientConfig = toml::from_str(
            r#"
base_url = "http://relay.internal:9000"
request_timeout_ms = 5000
"#,
        )
        .unwrap();
        assert_eq!(config.base_url, "http://relay.internal:9000");
        assert_eq!(config.request_timeout_ms, 5000);
        assert_eq!(config.max_message_length, 1000);
        assert_eq!(config.error_display_ms, 5000);
    }
}
