//! `relaychat send`: one exchange, then exit.
//!
//! Prints the reply text (or the `ChatResponse` JSON with `--json`). Any
//! failure, local or remote, ends in a non-zero exit.

use serde_json::json;

use relaychat_core::chat::{ChatClient, ExchangeOutcome, RelayTransport};
use relaychat_infra::http::HttpRelayTransport;
use relaychat_types::chat::Message;
use relaychat_types::config::ClientConfig;
use relaychat_types::error::ExchangeError;

/// Run a single exchange against the relay in `config`.
pub async fn send_message(config: &ClientConfig, text: &str, json: bool) -> anyhow::Result<()> {
    let transport = HttpRelayTransport::new(&config.base_url)?;
    let mut client = ChatClient::new(config, transport);

    let cancel = client.cancellation_token();
    let on_ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });
    let outcome = send_once(&mut client, text).await;
    on_ctrl_c.abort();

    match outcome {
        Ok(reply) => {
            if json {
                let body = json!({ "response": reply.text(), "timestamp": reply.timestamp() });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                println!("{}", reply.text());
            }
            Ok(())
        }
        Err(e) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&error_json(&e))?);
            }
            Err(e)
        }
    }
}

/// Submit `text` and return the assistant reply, or the failure as an error.
pub async fn send_once<T: RelayTransport>(
    client: &mut ChatClient<T>,
    text: &str,
) -> anyhow::Result<Message> {
    match client.send(text).await? {
        ExchangeOutcome::Replied(reply) => Ok(reply),
        ExchangeOutcome::Failed(error) => Err(error.into()),
        ExchangeOutcome::Ignored => anyhow::bail!("another request is already in flight"),
    }
}

fn error_json(e: &anyhow::Error) -> serde_json::Value {
    match e.downcast_ref::<ExchangeError>() {
        Some(exchange) => json!({
            "error": exchange.kind(),
            "status": exchange.status(),
            "message": exchange.to_string(),
        }),
        None => json!({ "error": "invalid_input", "message": e.to_string() }),
    }
}
