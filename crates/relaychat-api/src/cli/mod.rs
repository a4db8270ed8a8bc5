//! CLI command definitions for the `relaychat` binary.
//!
//! Uses clap derive macros. `serve` runs the relay; `chat` and `send` are
//! clients of a running relay.

pub mod chat;
pub mod send;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use relaychat_types::config::ClientConfig;

/// Chat with an AI model through a small relay server.
#[derive(Parser)]
#[command(name = "relaychat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the relay server.
    Serve(ServeArgs),

    /// Interactive chat with a running relay.
    Chat(ClientArgs),

    /// Send one message and print the reply.
    Send {
        /// Message to send.
        text: String,

        #[command(flatten)]
        client: ClientArgs,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Relay server settings.
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Host to bind to.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, env = "PORT", default_value = "8000")]
    pub port: u16,

    /// Upstream provider: openai, gemini or mistral.
    #[arg(long, env = "AI_PROVIDER", default_value = "openai")]
    pub provider: String,

    /// Override the provider's default model.
    #[arg(long, env = "AI_MODEL")]
    pub model: Option<String>,

    /// Override the provider's API base URL.
    #[arg(long, env = "AI_BASE_URL")]
    pub base_url: Option<String>,

    /// Longest accepted message, in characters.
    #[arg(long, env = "MAX_MESSAGE_LENGTH", default_value = "1000")]
    pub max_length: usize,

    /// Upstream call timeout, in seconds.
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value = "60")]
    pub upstream_timeout_secs: u64,
}

/// Client settings; each flag overrides `~/.relaychat/config.toml`.
#[derive(Args, Debug, Clone, Default)]
pub struct ClientArgs {
    /// Relay base URL.
    #[arg(long, env = "RELAYCHAT_URL")]
    pub url: Option<String>,

    /// Exchange timeout, in milliseconds.
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Longest accepted message, in characters.
    #[arg(long)]
    pub max_length: Option<usize>,
}

impl ClientArgs {
    /// Apply these flags on top of a loaded config.
    pub fn apply(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(url) = &self.url {
            config.base_url = url.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.request_timeout_ms = timeout_ms;
        }
        if let Some(max_length) = self.max_length {
            config.max_message_length = max_length;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_client_args_override_config() {
        let args = ClientArgs {
            url: Some("http://relay:9000".to_string()),
            timeout_ms: None,
            max_length: Some(200),
        };
        let config = args.apply(ClientConfig::default());
        assert_eq!(config.base_url, "http://relay:9000");
        assert_eq!(config.request_timeout_ms, 30_000);
        assert_eq!(config.max_message_length, 200);
    }

    #[test]
    fn test_parse_send_with_flags() {
        let cli = Cli::try_parse_from([
            "relaychat",
            "--json",
            "send",
            "Hello",
            "--timeout-ms",
            "5000",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Send { text, client } => {
                assert_eq!(text, "Hello");
                assert_eq!(client.timeout_ms, Some(5000));
            }
            _ => panic!("expected send"),
        }
    }

    #[test]
    fn test_parse_serve_port() {
        let cli = Cli::try_parse_from(["relaychat", "serve", "--port", "9001"]).unwrap();
        match cli.command {
            Commands::Serve(args) => assert_eq!(args.port, 9001),
            _ => panic!("expected serve"),
        }
    }
}
