//! Participant struct definition
//!
//! A joined connection as seen by the room: its display name and a
//! non-owning handle (the outbound channel) to the live connection.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::error::SendError;
use crate::message::ServerEvent;
use crate::types::ConnectionId;

/// Room member information
#[derive(Debug, Clone)]
pub struct Participant {
    /// Connection this participant is bound to
    pub id: ConnectionId,
    /// Self-reported display name
    pub name: String,
    /// Server → Client event channel
    pub sender: mpsc::Sender<ServerEvent>,
}

impl Participant {
    pub fn new(id: ConnectionId, name: String, sender: mpsc::Sender<ServerEvent>) -> Self {
        Self { id, name, sender }
    }

    /// Queue an event for this participant without waiting
    ///
    /// Fails if the connection is gone or its writer is not keeping up.
    pub fn send(&self, event: ServerEvent) -> Result<(), SendError> {
        deliver(&self.sender, event)
    }
}

/// Non-blocking delivery into a connection's outbound channel
pub(crate) fn deliver(
    sender: &mpsc::Sender<ServerEvent>,
    event: ServerEvent,
) -> Result<(), SendError> {
    sender.try_send(event).map_err(|e| match e {
        TrySendError::Full(_) => SendError::ChannelFull,
        TrySendError::Closed(_) => SendError::ChannelClosed,
    })
}
