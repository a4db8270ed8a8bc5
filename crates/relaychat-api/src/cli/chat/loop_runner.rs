//! Main chat loop orchestration.
//!
//! One [`ChatClient`] per session. Lines go through slash-command parsing,
//! then to the client. While an error is shown the prompt carries it; the
//! loop wakes at the error deadline to put the normal prompt back.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::time::Instant;

use relaychat_core::chat::{ChatClient, ExchangeOutcome, RelayTransport};
use relaychat_infra::http::HttpRelayTransport;
use relaychat_types::config::ClientConfig;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;

fn normal_prompt() -> String {
    format!("  {} ", style("You >").green().bold())
}

fn error_prompt(message: &str) -> String {
    format!(
        "  {} {} ",
        style(format!("[{message}]")).red(),
        style("You >").green().bold()
    )
}

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Run the interactive chat loop against the relay in `config`.
pub async fn run_chat_loop(config: ClientConfig) -> anyhow::Result<()> {
    let transport = HttpRelayTransport::new(&config.base_url)?;
    let mut client = ChatClient::new(&config, transport);
    let renderer = ChatRenderer::new();

    print_welcome_banner(&config);
    tracing::info!(relay = %config.base_url, "chat session started");

    let (mut chat_input, _writer) = ChatInput::new(normal_prompt())
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let deadline = client.session().error_deadline();

        let event = tokio::select! {
            event = chat_input.read_line() => event,
            _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if client.session_mut().expire_error(Instant::now()) {
                    chat_input.update_prompt(&normal_prompt());
                }
                continue;
            }
        };

        match event {
            InputEvent::Eof => break,
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
            }
            InputEvent::Message(text) => match commands::parse(&text) {
                Some(ChatCommand::Help) => commands::print_help(),
                Some(ChatCommand::Clear) => chat_input.clear(),
                Some(ChatCommand::Exit) => break,
                Some(ChatCommand::History) => renderer.print_history(client.session().transcript()),
                Some(ChatCommand::Unknown(name)) => {
                    println!(
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(name).dim()
                    );
                }
                None => {
                    let prompt =
                        handle_message(&mut client, &mut chat_input, &renderer, &text).await;
                    chat_input.update_prompt(&prompt);
                }
            },
        }
    }

    chat_input.flush();
    println!("\n  {}", style("Session ended.").dim());
    tracing::info!(
        messages = client.session().transcript().len(),
        "chat session ended"
    );
    Ok(())
}

/// Send one line and render the outcome. Returns the prompt to show next.
///
/// Input stays live while the request is in flight: Ctrl+C cancels this
/// exchange only. Lines typed meanwhile are dropped, like any submit while
/// sending.
async fn handle_message<T: RelayTransport>(
    client: &mut ChatClient<T>,
    chat_input: &mut ChatInput,
    renderer: &ChatRenderer,
    text: &str,
) -> String {
    let spinner = thinking_spinner();
    let cancel = client.exchange_token();
    let result = {
        let send = client.send_with(text, &cancel);
        tokio::pin!(send);
        loop {
            tokio::select! {
                result = &mut send => break result,
                event = chat_input.read_line(), if !cancel.is_cancelled() => {
                    if matches!(event, InputEvent::Interrupted | InputEvent::Eof) {
                        tracing::debug!("cancelling in-flight exchange");
                        cancel.cancel();
                    }
                }
            }
        }
    };
    spinner.finish_and_clear();

    match result {
        Ok(ExchangeOutcome::Replied(reply)) => {
            renderer.print_reply(&reply);
            normal_prompt()
        }
        Ok(ExchangeOutcome::Failed(error)) => {
            let message = error.to_string();
            renderer.print_error(&message);
            error_prompt(&message)
        }
        Ok(ExchangeOutcome::Ignored) => normal_prompt(),
        // Rejected locally: shown once, nothing was sent.
        Err(rejected) => {
            renderer.print_error(&rejected.to_string());
            match client.session().state().shown_error() {
                Some(shown) => error_prompt(&shown.to_string()),
                None => normal_prompt(),
            }
        }
    }
}
