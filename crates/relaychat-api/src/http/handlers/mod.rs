//! HTTP request handlers for the relay.

pub mod chat;
pub mod health;
