//! Error types for the chat relay
//!
//! Defines application-level errors, per-recipient send errors and
//! startup configuration errors. Uses thiserror for ergonomic definitions.

use thiserror::Error;

/// Application-level errors
///
/// Covers both fatal errors (connection termination) and
/// session errors (send error event to the offending client).
#[derive(Debug, Error)]
pub enum AppError {
    /// WebSocket protocol error (fatal)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel send error (fatal - internal channel broken)
    #[error("Channel send error")]
    ChannelSend,

    /// Message sent before joining the room
    #[error("Not joined")]
    NotJoined,

    /// Join sent on a connection that already joined
    #[error("Already joined as '{0}'")]
    AlreadyJoined(String),

    /// Join with an empty name
    #[error("Invalid name")]
    InvalidName,

    /// Name registered by another connection (reject policy only)
    #[error("Name taken: {0}")]
    NameTaken(String),

    /// Event received after the session closed
    #[error("Session closed")]
    SessionClosed,
}

/// Message send errors
///
/// Occurs when a delivery to a single recipient cannot be queued.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,

    /// The recipient is not draining its channel
    #[error("Channel full")]
    ChannelFull,
}

/// Startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port variable is not a valid u16
    #[error("Invalid port in {var}: '{value}'")]
    InvalidPort { var: &'static str, value: String },

    /// Unknown duplicate-name policy
    #[error("Invalid name policy: '{0}' (expected 'overwrite' or 'reject')")]
    InvalidNamePolicy(String),
}
