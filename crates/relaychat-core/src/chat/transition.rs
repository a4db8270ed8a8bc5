//! Pure transition function for the chat client.
//!
//! `transition(state, event, ctx)` never touches a clock, the network or the
//! transcript. Everything it needs from the outside world comes in through
//! [`TransitionContext`]; everything it wants done goes out as [`Effect`]s.

use std::time::Duration;

use chrono::{DateTime, Utc};

use relaychat_types::chat::{format_timestamp, ChatRequest, Message};
use relaychat_types::error::SubmitError;

use super::effect::Effect;
use super::event::Event;
use super::state::ClientState;

/// Inputs a transition may depend on besides state and event.
#[derive(Debug, Clone)]
pub struct TransitionContext {
    /// Wall-clock time used to stamp user messages and timestamp-less replies.
    pub now: DateTime<Utc>,
    /// Longest accepted input, in characters.
    pub max_message_length: usize,
    /// How long a shown error stays up.
    pub error_display: Duration,
    /// Id to give the exchange if this transition starts one.
    pub next_exchange: u64,
}

/// Result of a transition: the next state and the effects to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: ClientState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged(state: &ClientState) -> Self {
        Self {
            state: state.clone(),
            effects: Vec::new(),
        }
    }
}

/// Check user input and return the text to send.
///
/// Input is trimmed first; length is counted in characters of the trimmed text.
pub fn validate_input(text: &str, max_message_length: usize) -> Result<&str, SubmitError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SubmitError::Validation);
    }
    let length = trimmed.chars().count();
    if length > max_message_length {
        return Err(SubmitError::Length {
            max: max_message_length,
            actual: length,
        });
    }
    Ok(trimmed)
}

/// Compute the next state and effects for `event`.
///
/// Returns `Err` only for a rejected submission; the state is then unchanged.
/// A submission while `Sending` is a silent no-op, as are outcomes and timers
/// that do not belong to the current exchange.
pub fn transition(
    state: &ClientState,
    event: Event,
    ctx: &TransitionContext,
) -> Result<Transition, SubmitError> {
    match event {
        Event::Submit(text) => {
            if state.is_sending() {
                return Ok(Transition::unchanged(state));
            }
            let text = validate_input(&text, ctx.max_message_length)?;

            let mut effects = Vec::with_capacity(4);
            if matches!(state, ClientState::ErrorShown { .. }) {
                effects.push(Effect::HideError);
            }
            effects.push(Effect::AppendMessage(Message::user(
                text,
                format_timestamp(ctx.now),
            )));
            effects.push(Effect::ClearInput);
            effects.push(Effect::SendRequest {
                exchange: ctx.next_exchange,
                request: ChatRequest::new(text),
            });

            Ok(Transition {
                state: ClientState::Sending {
                    exchange: ctx.next_exchange,
                },
                effects,
            })
        }

        Event::ResponseReceived { exchange, response } => match state {
            ClientState::Sending { exchange: current } if *current == exchange => {
                let timestamp = response
                    .timestamp
                    .filter(|ts| !ts.trim().is_empty())
                    .unwrap_or_else(|| format_timestamp(ctx.now));
                Ok(Transition {
                    state: ClientState::Idle,
                    effects: vec![Effect::AppendMessage(Message::assistant(
                        response.response,
                        timestamp,
                    ))],
                })
            }
            _ => Ok(Transition::unchanged(state)),
        },

        Event::ExchangeFailed { exchange, error } => match state {
            ClientState::Sending { exchange: current } if *current == exchange => {
                let effects = vec![
                    Effect::ShowError {
                        exchange,
                        message: error.to_string(),
                    },
                    Effect::ScheduleErrorClear {
                        exchange,
                        after: ctx.error_display,
                    },
                ];
                Ok(Transition {
                    state: ClientState::ErrorShown { exchange, error },
                    effects,
                })
            }
            _ => Ok(Transition::unchanged(state)),
        },

        Event::ErrorExpired { exchange } => match state {
            ClientState::ErrorShown {
                exchange: current, ..
            } if *current == exchange => Ok(Transition {
                state: ClientState::Idle,
                effects: vec![Effect::HideError],
            }),
            _ => Ok(Transition::unchanged(state)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use relaychat_types::chat::{ChatResponse, Sender};
    use relaychat_types::error::ExchangeError;

    fn ctx() -> TransitionContext {
        TransitionContext {
            now: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            max_message_length: 10,
            error_display: Duration::from_secs(5),
            next_exchange: 7,
        }
    }

    fn submit(state: &ClientState, text: &str) -> Result<Transition, SubmitError> {
        transition(state, Event::Submit(text.to_string()), &ctx())
    }

    #[test]
    fn test_submit_from_idle_starts_exchange() {
        let t = submit(&ClientState::Idle, "  Hello ").unwrap();
        assert_eq!(t.state, ClientState::Sending { exchange: 7 });
        assert_eq!(
            t.effects,
            vec![
                Effect::AppendMessage(Message::user("Hello", "2024-01-01T12:00:00.000Z")),
                Effect::ClearInput,
                Effect::SendRequest {
                    exchange: 7,
                    request: ChatRequest::new("Hello"),
                },
            ]
        );
    }

    #[test]
    fn test_submit_rejects_blank_input() {
        for text in ["", " ", "\t\n  "] {
            assert_eq!(submit(&ClientState::Idle, text), Err(SubmitError::Validation));
        }
    }

    #[test]
    fn test_submit_rejects_long_input() {
        let err = submit(&ClientState::Idle, "abcdefghijk").unwrap_err();
        assert_eq!(err, SubmitError::Length { max: 10, actual: 11 });
        assert!(submit(&ClientState::Idle, "abcdefghij").is_ok());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // Ten two-byte characters fit a ten-character limit.
        assert!(submit(&ClientState::Idle, "éééééééééé").is_ok());
    }

    #[test]
    fn test_submit_while_sending_is_noop() {
        let sending = ClientState::Sending { exchange: 3 };
        let t = submit(&sending, "Hello again").unwrap();
        assert_eq!(t.state, sending);
        assert!(t.effects.is_empty());

        // Even invalid input is swallowed while a request is in flight.
        let t = submit(&sending, "").unwrap();
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_submit_from_error_hides_error_first() {
        let shown = ClientState::ErrorShown {
            exchange: 2,
            error: ExchangeError::Cancelled,
        };
        let t = submit(&shown, "retry").unwrap();
        assert_eq!(t.state, ClientState::Sending { exchange: 7 });
        assert_eq!(t.effects.first(), Some(&Effect::HideError));
    }

    #[test]
    fn test_invalid_submit_keeps_error_shown() {
        let shown = ClientState::ErrorShown {
            exchange: 2,
            error: ExchangeError::Cancelled,
        };
        assert!(submit(&shown, "   ").is_err());
    }

    #[test]
    fn test_response_uses_relay_timestamp() {
        let t = transition(
            &ClientState::Sending { exchange: 7 },
            Event::ResponseReceived {
                exchange: 7,
                response: ChatResponse {
                    response: "Hi there!".to_string(),
                    timestamp: Some("2024-01-01T00:00:00Z".to_string()),
                },
            },
            &ctx(),
        )
        .unwrap();

        assert_eq!(t.state, ClientState::Idle);
        match &t.effects[..] {
            [Effect::AppendMessage(msg)] => {
                assert_eq!(msg.sender(), Sender::Assistant);
                assert_eq!(msg.text(), "Hi there!");
                assert_eq!(msg.timestamp(), "2024-01-01T00:00:00Z");
            }
            other => panic!("unexpected effects: {other:?}"),
        }
    }

    #[test]
    fn test_response_without_timestamp_uses_client_clock() {
        let t = transition(
            &ClientState::Sending { exchange: 7 },
            Event::ResponseReceived {
                exchange: 7,
                response: ChatResponse {
                    response: "ok".to_string(),
                    timestamp: None,
                },
            },
            &ctx(),
        )
        .unwrap();

        let Effect::AppendMessage(msg) = &t.effects[0] else {
            panic!("expected AppendMessage");
        };
        assert_eq!(msg.timestamp(), "2024-01-01T12:00:00.000Z");
    }

    #[test]
    fn test_stale_response_is_ignored() {
        let state = ClientState::Sending { exchange: 7 };
        let t = transition(
            &state,
            Event::ResponseReceived {
                exchange: 6,
                response: ChatResponse {
                    response: "late".to_string(),
                    timestamp: None,
                },
            },
            &ctx(),
        )
        .unwrap();
        assert_eq!(t.state, state);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_failure_shows_error_and_schedules_clear() {
        let error = ExchangeError::Timeout { after_ms: 30_000 };
        let t = transition(
            &ClientState::Sending { exchange: 7 },
            Event::ExchangeFailed {
                exchange: 7,
                error: error.clone(),
            },
            &ctx(),
        )
        .unwrap();

        assert_eq!(
            t.state,
            ClientState::ErrorShown {
                exchange: 7,
                error
            }
        );
        assert_eq!(
            t.effects,
            vec![
                Effect::ShowError {
                    exchange: 7,
                    message: "Request timed out. Please try again.".to_string(),
                },
                Effect::ScheduleErrorClear {
                    exchange: 7,
                    after: Duration::from_secs(5),
                },
            ]
        );
        assert!(!t
            .effects
            .iter()
            .any(|e| matches!(e, Effect::AppendMessage(_))));
    }

    #[test]
    fn test_error_expiry_returns_to_idle() {
        let shown = ClientState::ErrorShown {
            exchange: 4,
            error: ExchangeError::Cancelled,
        };
        let t = transition(&shown, Event::ErrorExpired { exchange: 4 }, &ctx()).unwrap();
        assert_eq!(t.state, ClientState::Idle);
        assert_eq!(t.effects, vec![Effect::HideError]);
    }

    #[test]
    fn test_stale_error_timer_is_ignored() {
        let shown = ClientState::ErrorShown {
            exchange: 5,
            error: ExchangeError::Cancelled,
        };
        let t = transition(&shown, Event::ErrorExpired { exchange: 4 }, &ctx()).unwrap();
        assert_eq!(t.state, shown);

        let t = transition(&ClientState::Idle, Event::ErrorExpired { exchange: 5 }, &ctx())
            .unwrap();
        assert_eq!(t.state, ClientState::Idle);
    }
}
