//! Chat client core for relaychat.
//!
//! The client is an explicit state machine: [`transition`] is a pure
//! function from (state, event) to (state, effects); [`ChatSession`] owns the
//! state and transcript and applies effects; [`ChatClient`] binds a session
//! to a [`RelayTransport`] and runs exchanges with a hard timeout.

pub mod client;
pub mod effect;
pub mod event;
pub mod exchange;
pub mod session;
pub mod state;
pub mod transition;

pub use client::{ChatClient, ExchangeOutcome};
pub use effect::Effect;
pub use event::Event;
pub use exchange::{run_exchange, RelayTransport};
pub use session::{ChatSession, PendingExchange};
pub use state::ClientState;
pub use transition::{transition, validate_input, Transition, TransitionContext};
