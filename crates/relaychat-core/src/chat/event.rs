//! Inputs to the client state machine.

use relaychat_types::chat::ChatResponse;
use relaychat_types::error::ExchangeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The user pressed send with this input.
    Submit(String),
    /// The relay answered exchange `exchange` with a 2xx.
    ResponseReceived {
        exchange: u64,
        response: ChatResponse,
    },
    /// Exchange `exchange` failed (timeout, connection, server error).
    ExchangeFailed { exchange: u64, error: ExchangeError },
    /// The auto-clear timer for the error of `exchange` fired.
    ErrorExpired { exchange: u64 },
}
