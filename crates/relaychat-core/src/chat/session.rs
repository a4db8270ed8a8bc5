//! Chat session: the owned state object behind one client.
//!
//! Wraps the pure [`transition`] function with the mutable pieces it must not
//! own itself: the current [`ClientState`], the [`Transcript`], the exchange
//! counter and the error auto-clear deadline. Nothing here is global, so any
//! number of independent sessions can coexist.

use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;

use relaychat_types::chat::{ChatRequest, ChatResponse, Transcript};
use relaychat_types::config::ClientConfig;
use relaychat_types::error::{ExchangeError, SubmitError};

use super::effect::Effect;
use super::event::Event;
use super::state::ClientState;
use super::transition::{transition, TransitionContext};

/// An accepted submission that now needs its network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingExchange {
    pub exchange: u64,
    pub request: ChatRequest,
}

/// State, transcript and bookkeeping for a single client session.
#[derive(Debug)]
pub struct ChatSession {
    state: ClientState,
    transcript: Transcript,
    max_message_length: usize,
    error_display: Duration,
    /// Number of exchanges started so far; also the id of the latest one.
    exchanges_started: u64,
    error_deadline: Option<Instant>,
}

impl ChatSession {
    pub fn new(max_message_length: usize, error_display: Duration) -> Self {
        Self {
            state: ClientState::Idle,
            transcript: Transcript::new(),
            max_message_length,
            error_display,
            exchanges_started: 0,
            error_deadline: None,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.max_message_length, config.error_display())
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Requests currently on the wire: 0 or 1.
    pub fn in_flight(&self) -> usize {
        usize::from(self.state.is_sending())
    }

    /// When the shown error should be cleared, if one is shown.
    pub fn error_deadline(&self) -> Option<Instant> {
        self.error_deadline
    }

    /// Feed one event through the state machine and apply its effects.
    ///
    /// Transcript and timer effects are applied here; the full effect list is
    /// returned so the caller can render the rest.
    pub fn dispatch(&mut self, event: Event) -> Result<Vec<Effect>, SubmitError> {
        let ctx = TransitionContext {
            now: Utc::now(),
            max_message_length: self.max_message_length,
            error_display: self.error_display,
            next_exchange: self.exchanges_started + 1,
        };

        let step = transition(&self.state, event, &ctx)?;

        for effect in &step.effects {
            match effect {
                Effect::AppendMessage(message) => self.transcript.push(message.clone()),
                Effect::SendRequest { exchange, .. } => self.exchanges_started = *exchange,
                Effect::ScheduleErrorClear { after, .. } => {
                    self.error_deadline = Some(Instant::now() + *after);
                }
                Effect::HideError => self.error_deadline = None,
                Effect::ClearInput | Effect::ShowError { .. } => {}
            }
        }

        if step.state != self.state {
            tracing::debug!(from = self.state.name(), to = step.state.name(), "client state change");
        }
        self.state = step.state;
        Ok(step.effects)
    }

    /// Submit user input.
    ///
    /// Returns the exchange to dispatch, or `None` when a request is already
    /// in flight (the submission is then ignored).
    pub fn submit(&mut self, text: &str) -> Result<Option<PendingExchange>, SubmitError> {
        let effects = self.dispatch(Event::Submit(text.to_string()))?;
        Ok(effects.into_iter().find_map(|effect| match effect {
            Effect::SendRequest { exchange, request } => Some(PendingExchange { exchange, request }),
            _ => None,
        }))
    }

    /// Record the relay's reply to the in-flight exchange.
    ///
    /// Returns `false` if nothing was in flight.
    pub fn receive(&mut self, response: ChatResponse) -> bool {
        let ClientState::Sending { exchange } = self.state else {
            return false;
        };
        self.dispatch(Event::ResponseReceived { exchange, response })
            .map(|effects| !effects.is_empty())
            .unwrap_or(false)
    }

    /// Record the failure of the in-flight exchange.
    ///
    /// The error is shown and scheduled for auto-clear; the transcript is
    /// left as it is.
    pub fn fail(&mut self, error: ExchangeError) -> bool {
        let ClientState::Sending { exchange } = self.state else {
            return false;
        };
        self.dispatch(Event::ExchangeFailed { exchange, error })
            .map(|effects| !effects.is_empty())
            .unwrap_or(false)
    }

    /// Clear the shown error if its display time is over.
    ///
    /// Returns `true` if an error was cleared.
    pub fn expire_error(&mut self, now: Instant) -> bool {
        let ClientState::ErrorShown { exchange, .. } = self.state else {
            return false;
        };
        match self.error_deadline {
            Some(deadline) if now >= deadline => self
                .dispatch(Event::ErrorExpired { exchange })
                .map(|effects| !effects.is_empty())
                .unwrap_or(false),
            _ => false,
        }
    }
}
