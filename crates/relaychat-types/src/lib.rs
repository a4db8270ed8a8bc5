//! Shared wire and domain types for relaychat.
//!
//! This crate contains the types exchanged between the chat client and the
//! relay (`ChatRequest`, `ChatResponse`, `ErrorResponse`), the client-side
//! transcript model, the upstream LLM request shapes, and the error enums
//! used across the workspace.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
