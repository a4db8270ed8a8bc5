//! reqwest-based [`RelayTransport`].
//!
//! Posts a [`ChatRequest`] to `{base_url}/chat` and sorts every failure into
//! connection or server errors. Timeouts are not set here: the exchange runner
//! in `relaychat-core` bounds the whole call and drops this future on expiry.

use std::time::Duration;

use reqwest::{StatusCode, Url};

use relaychat_core::chat::RelayTransport;
use relaychat_types::chat::{ChatRequest, ChatResponse, ErrorResponse};
use relaychat_types::error::{ConfigError, ExchangeError};

/// Shown when a failed response carries no usable detail or status text.
const FALLBACK_ERROR: &str = "Request failed";

/// Connection establishment limit; the overall exchange timeout still applies.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct HttpRelayTransport {
    http: reqwest::Client,
    chat_url: Url,
}

impl HttpRelayTransport {
    /// Create a transport for the relay at `base_url` (e.g. `http://localhost:8000`).
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let chat_url = chat_url(base_url)?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("relaychat/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self { http, chat_url })
    }
}

fn chat_url(base_url: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        url: base_url.to_string(),
        reason,
    };
    let base = Url::parse(base_url.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", base.scheme())));
    }
    let joined = format!("{}/chat", base.as_str().trim_end_matches('/'));
    Url::parse(&joined).map_err(|e| invalid(e.to_string()))
}

/// Classify a transport-level failure.
///
/// Anything that kept the request from getting an HTTP status back (refused,
/// DNS, reset, TLS) is a connection failure.
fn classify_send_error(err: &reqwest::Error) -> ExchangeError {
    if err.is_connect() || err.is_request() || err.is_timeout() {
        ExchangeError::Connection {
            reason: err.to_string(),
        }
    } else if let Some(status) = err.status() {
        ExchangeError::Server {
            status: status.as_u16(),
            message: status_text(status),
        }
    } else {
        ExchangeError::Connection {
            reason: err.to_string(),
        }
    }
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or(FALLBACK_ERROR)
        .to_string()
}

/// Message for a non-success response: the body's `detail`/`message` when
/// present, else the status text.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|parsed| parsed.summary())
        .unwrap_or_else(|| status_text(status))
}

impl RelayTransport for HttpRelayTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ExchangeError> {
        let response = self
            .http
            .post(self.chat_url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| classify_send_error(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExchangeError::Connection {
                reason: e.to_string(),
            })?;

        if !status.is_success() {
            let message = error_message(status, &body);
            tracing::debug!(status = status.as_u16(), %message, "relay returned an error");
            return Err(ExchangeError::Server {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str::<ChatResponse>(&body).map_err(|e| {
            tracing::warn!(error = %e, "relay sent an unreadable reply");
            ExchangeError::Server {
                status: status.as_u16(),
                message: "Invalid response from server".to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn transport(server: &MockServer) -> HttpRelayTransport {
        HttpRelayTransport::new(&server.uri()).unwrap()
    }

    #[test]
    fn test_chat_url_joins_path() {
        assert_eq!(
            chat_url("http://localhost:8000").unwrap().as_str(),
            "http://localhost:8000/chat"
        );
        assert_eq!(
            chat_url("http://relay.local/api/").unwrap().as_str(),
            "http://relay.local/api/chat"
        );
    }

    #[test]
    fn test_chat_url_rejects_garbage() {
        assert!(matches!(
            chat_url("not a url"),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            chat_url("ftp://relay.local"),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_success_returns_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(json!({"message": "Hello"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": "Hi there!",
                "timestamp": "2024-01-01T00:00:00Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = transport(&server)
            .await
            .send(&ChatRequest::new("Hello"))
            .await
            .unwrap();
        assert_eq!(reply.response, "Hi there!");
        assert_eq!(reply.timestamp.as_deref(), Some("2024-01-01T00:00:00Z"));
    }

    #[tokio::test]
    async fn test_server_error_uses_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"detail": "upstream unavailable"})),
            )
            .mount(&server)
            .await;

        let err = transport(&server)
            .await
            .send(&ChatRequest::new("Hello"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ExchangeError::Server {
                status: 500,
                message: "upstream unavailable".to_string(),
            }
        );
        assert_eq!(err.to_string(), "upstream unavailable (Status: 500)");
    }

    #[tokio::test]
    async fn test_server_error_uses_message_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({"message": "busy"})))
            .mount(&server)
            .await;

        let err = transport(&server)
            .await
            .send(&ChatRequest::new("Hello"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "busy (Status: 503)");
    }

    #[tokio::test]
    async fn test_unparseable_error_body_falls_back_to_status_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
            .mount(&server)
            .await;

        let err = transport(&server)
            .await
            .send(&ChatRequest::new("Hello"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ExchangeError::Server {
                status: 502,
                message: "Bad Gateway".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_validation_error_list_is_joined() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "detail": [{"msg": "field required"}, {"msg": "too long"}]
            })))
            .mount(&server)
            .await;

        let err = transport(&server)
            .await
            .send(&ChatRequest::new("Hello"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.to_string(), "field required; too long (Status: 422)");
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_a_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = transport(&server)
            .await
            .send(&ChatRequest::new("Hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExchangeError::Server { status: 200, .. }));
    }

    #[tokio::test]
    async fn test_closed_port_is_a_connection_error() {
        // Bind then drop a listener so the port is known to be free.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let transport = HttpRelayTransport::new(&format!("http://127.0.0.1:{port}")).unwrap();

        let err = transport.send(&ChatRequest::new("Hello")).await.unwrap_err();
        assert!(matches!(err, ExchangeError::Connection { .. }), "{err:?}");
        assert_eq!(
            err.to_string(),
            "Unable to connect to the server. Please check that the relay is running."
        );
    }
}
