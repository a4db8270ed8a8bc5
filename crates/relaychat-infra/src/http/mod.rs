//! HTTP client side of the relay protocol.

pub mod relay_client;

pub use relay_client::HttpRelayTransport;
