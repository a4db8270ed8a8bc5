//! The relay: validate a chat message, forward it upstream, return the reply.

pub mod service;

pub use service::{RelayService, RelaySettings};
