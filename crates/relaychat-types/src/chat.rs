//! Chat wire types and the client-side transcript model.
//!
//! `ChatRequest` / `ChatResponse` / `ErrorResponse` are the JSON bodies of
//! `POST /chat`. `Message` and `Transcript` model the conversation as the
//! client sees it: an append-only list of immutable messages.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Format a UTC instant the way the relay and client stamp messages
/// (RFC 3339, millisecond precision, `Z` suffix).
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time as an ISO-8601 timestamp string.
pub fn timestamp_now() -> String {
    format_timestamp(Utc::now())
}

/// Who authored a message in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// A single message in the transcript.
///
/// Fields are private: a message cannot be edited once it has been created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    sender: Sender,
    text: String,
    timestamp: String,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp: timestamp.into(),
        }
    }

    /// A message typed by the user.
    pub fn user(text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self::new(Sender::User, text, timestamp)
    }

    /// A reply produced by the relay.
    pub fn assistant(text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, text, timestamp)
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// ISO-8601 timestamp string.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

/// Ordered, append-only record of the messages in one client session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message. There is no way to remove or reorder messages.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

/// Request body for `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Success body for `POST /chat`.
///
/// The relay always sets `timestamp`; the client tolerates its absence and
/// stamps the reply with its own clock instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// One entry of a list-shaped `detail`, as emitted by request validators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorItem {
    pub msg: String,
}

/// `detail` is either a plain string or a list of validation items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Text(String),
    Items(Vec<ErrorItem>),
}

/// Failure body for `POST /chat`: `{"detail": ...}` or `{"message": ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<ErrorDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// The shape the relay emits: `{"detail": "<text>"}`.
    pub fn detail(text: impl Into<String>) -> Self {
        Self {
            detail: Some(ErrorDetail::Text(text.into())),
            message: None,
        }
    }

    /// Best human-readable summary of the body, if it carries one.
    ///
    /// Prefers `detail`; list-shaped details are joined with `"; "`.
    pub fn summary(&self) -> Option<String> {
        let from_detail = match &self.detail {
            Some(ErrorDetail::Text(text)) => Some(text.trim().to_string()),
            Some(ErrorDetail::Items(items)) => Some(
                items
                    .iter()
                    .map(|item| item.msg.trim())
                    .filter(|msg| !msg.is_empty())
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            None => None,
        };

        from_detail
            .filter(|s| !s.is_empty())
            .or_else(|| {
                self.message
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
    }
}

/// Overall relay health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub timestamp: String,
    pub ai_provider: String,
}
