//! Business logic and port traits for relaychat.
//!
//! `chat` is the client side: a pure state machine, the session that owns its
//! state and the exchange runner. `relay` is the server side. `llm` holds the
//! upstream provider port. The infrastructure layer implements the ports; this
//! crate never depends on an HTTP client.

pub mod chat;
pub mod llm;
pub mod relay;
