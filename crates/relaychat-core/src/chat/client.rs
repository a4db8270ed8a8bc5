//! Chat client: a session bound to a relay transport.
//!
//! `ChatClient::send` runs one complete exchange: submit, dispatch with
//! timeout and cancellation, then record the reply or the failure.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use relaychat_types::chat::Message;
use relaychat_types::config::ClientConfig;
use relaychat_types::error::{ExchangeError, SubmitError};

use super::exchange::{run_exchange, RelayTransport};
use super::session::ChatSession;

/// What happened to an accepted `send`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// The relay answered; this is the assistant message now in the transcript.
    Replied(Message),
    /// The exchange failed; the error is shown and the transcript untouched.
    Failed(ExchangeError),
    /// Another exchange was in flight, so nothing happened.
    Ignored,
}

/// One client session talking to one relay.
pub struct ChatClient<T> {
    session: ChatSession,
    transport: T,
    request_timeout: Duration,
    cancel: CancellationToken,
}

impl<T: RelayTransport> ChatClient<T> {
    pub fn new(config: &ClientConfig, transport: T) -> Self {
        Self {
            session: ChatSession::from_config(config),
            transport,
            request_timeout: config.request_timeout(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ChatSession {
        &mut self.session
    }

    /// Session-wide token. Cancelling it aborts the in-flight exchange and
    /// every later one (used on shutdown).
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Fresh token for a single exchange.
    ///
    /// It is a child of [`Self::cancellation_token`], so cancelling the session
    /// still reaches it, while cancelling it leaves later exchanges alone.
    pub fn exchange_token(&self) -> CancellationToken {
        self.cancel.child_token()
    }

    /// Submit `text` and run the exchange to completion.
    ///
    /// Validation failures are returned as `Err` and never touch the network.
    pub async fn send(&mut self, text: &str) -> Result<ExchangeOutcome, SubmitError> {
        let cancel = self.exchange_token();
        self.send_with(text, &cancel).await
    }

    /// Like [`Self::send`], aborted early when `cancel` fires.
    ///
    /// `cancel` should come from [`Self::exchange_token`]. A cancelled exchange
    /// ends as `Failed(ExchangeError::Cancelled)`.
    pub async fn send_with(
        &mut self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<ExchangeOutcome, SubmitError> {
        let Some(pending) = self.session.submit(text)? else {
            return Ok(ExchangeOutcome::Ignored);
        };

        tracing::info!(
            exchange = pending.exchange,
            chars = pending.request.message.chars().count(),
            "sending message to relay"
        );

        let result = run_exchange(
            &self.transport,
            &pending.request,
            self.request_timeout,
            cancel,
        )
        .await;

        match result {
            Ok(response) => {
                if !self.session.receive(response) {
                    return Ok(ExchangeOutcome::Ignored);
                }
                Ok(self
                    .session
                    .transcript()
                    .last()
                    .cloned()
                    .map_or(ExchangeOutcome::Ignored, ExchangeOutcome::Replied))
            }
            Err(error) => {
                self.session.fail(error.clone());
                Ok(ExchangeOutcome::Failed(error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::exchange::tests::ScriptedTransport;
    use crate::chat::state::ClientState;
    use relaychat_types::chat::Sender;

    fn config() -> ClientConfig {
        ClientConfig::default()
    }

    #[tokio::test(start_paused = true)]
    async fn test_hello_round_trip() {
        let transport = ScriptedTransport::replying("Hi there!", Some("2024-01-01T00:00:00Z"));
        let mut client = ChatClient::new(&config(), transport);

        let reply = match client.send("Hello").await.unwrap() {
            ExchangeOutcome::Replied(reply) => reply,
            other => panic!("expected a reply, got {other:?}"),
        };
        assert_eq!(reply.timestamp(), "2024-01-01T00:00:00Z");

        let transcript: Vec<(Sender, &str)> = client
            .session()
            .transcript()
            .iter()
            .map(|m| (m.sender(), m.text()))
            .collect();
        assert_eq!(
            transcript,
            vec![(Sender::User, "Hello"), (Sender::Assistant, "Hi there!")]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_input_makes_no_call() {
        let transport = ScriptedTransport::replying("unused", None);
        let calls = transport.calls.clone();
        let mut client = ChatClient::new(&config(), transport);

        assert_eq!(client.send("").await.unwrap_err(), SubmitError::Validation);
        assert!(client.session().transcript().is_empty());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlong_input_makes_no_call() {
        let transport = ScriptedTransport::replying("unused", None);
        let calls = transport.calls.clone();
        let mut client = ChatClient::new(&config(), transport);

        let err = client.send(&"a".repeat(1001)).await.unwrap_err();
        assert!(matches!(err, SubmitError::Length { max: 1000, actual: 1001 }));
        assert!(client.session().transcript().is_empty());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_error_is_surfaced_with_status() {
        let transport = ScriptedTransport::failing(ExchangeError::Server {
            status: 500,
            message: "upstream unavailable".to_string(),
        });
        let mut client = ChatClient::new(&config(), transport);

        let outcome = client.send("Hello").await.unwrap();
        let ExchangeOutcome::Failed(error) = outcome else {
            panic!("expected failure");
        };
        assert_eq!(error.to_string(), "upstream unavailable (Status: 500)");
        assert_eq!(client.session().transcript().len(), 1);
        assert!(matches!(client.session().state(), ClientState::ErrorShown { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_relay_times_out() {
        let transport = ScriptedTransport::replying("too late", None)
            .delayed(Duration::from_millis(30_001));
        let mut client = ChatClient::new(&config(), transport);

        let outcome = client.send("Hello").await.unwrap();
        assert_eq!(
            outcome,
            ExchangeOutcome::Failed(ExchangeError::Timeout { after_ms: 30_000 })
        );
        assert_eq!(
            client.session().state().shown_error().unwrap().to_string(),
            "Request timed out. Please try again."
        );
        // Only the user message; no assistant reply was recorded.
        assert_eq!(client.session().transcript().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_recovers_after_failure() {
        let transport = ScriptedTransport::failing(ExchangeError::Connection {
            reason: "refused".to_string(),
        });
        let mut client = ChatClient::new(&config(), transport);
        client.send("one").await.unwrap();

        client.transport.outcome = Ok(relaychat_types::chat::ChatResponse {
            response: "back".to_string(),
            timestamp: None,
        });
        let outcome = client.send("two").await.unwrap();
        assert!(matches!(outcome, ExchangeOutcome::Replied(_)));
        assert_eq!(client.session().transcript().len(), 3);
        assert_eq!(client.session().state(), &ClientState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_exchange_does_not_poison_the_next() {
        let transport =
            ScriptedTransport::replying("slow", None).delayed(Duration::from_secs(10));
        let mut client = ChatClient::new(&config(), transport);

        let cancel = client.exchange_token();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });

        let outcome = client.send_with("Hello", &cancel).await.unwrap();
        assert_eq!(outcome, ExchangeOutcome::Failed(ExchangeError::Cancelled));
        assert_eq!(
            client.session().state(),
            &ClientState::ErrorShown {
                exchange: 1,
                error: ExchangeError::Cancelled,
            }
        );
        assert_eq!(client.session().transcript().len(), 1);

        client.transport.delay = Duration::ZERO;
        let outcome = client.send("again").await.unwrap();
        assert!(matches!(outcome, ExchangeOutcome::Replied(_)), "{outcome:?}");
        assert_eq!(client.session().state(), &ClientState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_cancel_reaches_exchange_token() {
        let transport =
            ScriptedTransport::replying("slow", None).delayed(Duration::from_secs(10));
        let mut client = ChatClient::new(&config(), transport);
        let session = client.cancellation_token();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            session.cancel();
        });

        let outcome = client.send("Hello").await.unwrap();
        assert_eq!(outcome, ExchangeOutcome::Failed(ExchangeError::Cancelled));
    }
}
