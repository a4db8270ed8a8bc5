//! Interactive terminal chat against a running relay.
//!
//! Markdown-rendered replies, a spinner while a request is in flight, errors
//! shown in the prompt until they expire, and slash commands. Entry point:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
