//! Client UI state.

use relaychat_types::error::ExchangeError;

/// Where the chat client is in its exchange cycle.
///
/// `Sending` blocks new submissions; this is the only mutual exclusion the
/// client needs. Exchange ids are assigned by the session and tie responses,
/// failures and error timers back to the exchange that produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ClientState {
    #[default]
    Idle,
    Sending {
        exchange: u64,
    },
    ErrorShown {
        exchange: u64,
        error: ExchangeError,
    },
}

impl ClientState {
    pub fn is_sending(&self) -> bool {
        matches!(self, ClientState::Sending { .. })
    }

    /// The error currently on screen, if any.
    pub fn shown_error(&self) -> Option<&ExchangeError> {
        match self {
            ClientState::ErrorShown { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ClientState::Idle => "idle",
            ClientState::Sending { .. } => "sending",
            ClientState::ErrorShown { .. } => "error_shown",
        }
    }
}
