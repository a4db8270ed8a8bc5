//! Infrastructure layer for relaychat.
//!
//! Implements the ports defined in `relaychat-core`: the reqwest-based
//! [`http::HttpRelayTransport`] the client uses to reach the relay, and the
//! OpenAI-compatible upstream provider the relay forwards to. Also loads the
//! client's TOML configuration.

pub mod config;
pub mod http;
pub mod llm;
