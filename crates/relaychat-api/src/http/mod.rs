//! HTTP layer of the relay: `POST /chat` and `GET /health`.

pub mod error;
pub mod handlers;
pub mod router;
