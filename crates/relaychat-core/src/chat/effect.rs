//! Side effects requested by a state transition.

use std::time::Duration;

use relaychat_types::chat::{ChatRequest, Message};

/// Work the shell must carry out after a transition, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Empty the input box.
    ClearInput,
    /// Append to the transcript.
    AppendMessage(Message),
    /// Issue the network call for `exchange`.
    SendRequest { exchange: u64, request: ChatRequest },
    /// Put a human-readable error on screen.
    ShowError { exchange: u64, message: String },
    /// Arrange for `Event::ErrorExpired { exchange }` after `after`.
    ScheduleErrorClear { exchange: u64, after: Duration },
    /// Take the current error off screen.
    HideError,
}
