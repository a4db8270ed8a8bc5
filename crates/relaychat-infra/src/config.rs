//! Client configuration loader for relaychat.
//!
//! Reads `config.toml` from the relaychat directory (`~/.relaychat/` by
//! default) into a [`ClientConfig`]. Falls back to defaults when the file is
//! missing or malformed; command-line flags are applied on top by the caller.

use std::path::{Path, PathBuf};

use relaychat_types::config::ClientConfig;

/// Name of the directory under `$HOME` holding relaychat files.
const CONFIG_DIR_NAME: &str = ".relaychat";

/// Resolve the relaychat directory.
///
/// `RELAYCHAT_HOME` wins when set; otherwise `~/.relaychat`, or
/// `./.relaychat` when no home directory is known.
pub fn resolve_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("RELAYCHAT_HOME") {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    match dirs::home_dir() {
        Some(home) => home.join(CONFIG_DIR_NAME),
        None => PathBuf::from(CONFIG_DIR_NAME),
    }
}

/// Load client configuration from `{config_dir}/config.toml`.
///
/// - Missing file: [`ClientConfig::default()`].
/// - Unreadable or unparsable file: a warning is logged and the default is used.
pub async fn load_client_config(config_dir: &Path) -> ClientConfig {
    let config_path = config_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ClientConfig::default()
        }
    }
}
