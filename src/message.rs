//! Message protocol definitions
//!
//! JSON event protocol using Serde's adjacently tagged enums:
//! `{"event": "<name>", "data": {...}}`. Payloads are validated at the
//! boundary, so a `join` without `name` or a `msg` without `msg` never
//! reaches the relay.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::types::SERVER_NAME;

/// Client → Server event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Announce a display name and join the room
    Join { name: String },
    /// Send a chat message to the room
    Msg { msg: String },
}

impl ClientEvent {
    /// Parse a client event from a JSON text frame
    pub fn parse(text: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse a client event from a binary frame holding UTF-8 JSON
    pub fn parse_bytes(bytes: &[u8]) -> Result<Self, AppError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// The `{name, msg}` payload carried by every relayed message and notice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Sender display name, or "server" for system notices
    pub name: String,
    /// Message text
    pub msg: String,
}

impl Envelope {
    pub fn new(name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            msg: msg.into(),
        }
    }

    /// A system notice sent under the "server" name
    pub fn server(msg: impl Into<String>) -> Self {
        Self::new(SERVER_NAME, msg)
    }
}

/// Server → Client event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Relayed chat message or server notice
    Msg(Envelope),
    /// The client's last event was rejected
    Error { code: ErrorCode, message: String },
}

impl From<Envelope> for ServerEvent {
    fn from(envelope: Envelope) -> Self {
        ServerEvent::Msg(envelope)
    }
}

/// Error codes for ServerEvent::Error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Message sent before joining
    NotJoined,
    /// Second join on the same connection
    AlreadyJoined,
    /// Empty display name
    InvalidName,
    /// Display name held by another connection
    NameTaken,
    /// Event after disconnect
    SessionClosed,
    /// Invalid message format
    InvalidMessage,
}

/// Convert AppError to ServerEvent for client notification
impl From<AppError> for ServerEvent {
    fn from(err: AppError) -> Self {
        let (code, message) = match &err {
            AppError::NotJoined => (
                ErrorCode::NotJoined,
                "Join the room before sending messages".to_string(),
            ),
            AppError::AlreadyJoined(name) => (
                ErrorCode::AlreadyJoined,
                format!("You already joined as '{}'", name),
            ),
            AppError::InvalidName => {
                (ErrorCode::InvalidName, "Name must not be empty".to_string())
            }
            AppError::NameTaken(name) => {
                (ErrorCode::NameTaken, format!("Name '{}' is taken", name))
            }
            AppError::SessionClosed => {
                (ErrorCode::SessionClosed, "Session is closed".to_string())
            }
            AppError::Json(e) => (
                ErrorCode::InvalidMessage,
                format!("Invalid message format: {}", e),
            ),
            // Fatal errors are not typically converted (connection closes)
            _ => (ErrorCode::InvalidMessage, "Internal error".to_string()),
        };
        ServerEvent::Error { code, message }
    }
}
