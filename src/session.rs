//! Session handler
//!
//! Per-connection state machine: `Connected → Joined → Closed`.
//! The session does not own the registry or the room; the relay server
//! passes them in for every event, so all mutations happen under the
//! server actor's exclusive access.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::NamePolicy;
use crate::error::AppError;
use crate::message::{Envelope, ServerEvent};
use crate::participant::{deliver, Participant};
use crate::registry::Registry;
use crate::room::Room;
use crate::types::ConnectionId;

/// Session lifecycle state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Transport accepted, no join yet
    Connected,
    /// Joined the room under `name`
    Joined { name: String },
    /// Disconnected; accepts no further events
    Closed,
}

/// State for one connection
#[derive(Debug)]
pub struct Session {
    id: ConnectionId,
    sender: mpsc::Sender<ServerEvent>,
    state: SessionState,
}

impl Session {
    pub fn new(id: ConnectionId, sender: mpsc::Sender<ServerEvent>) -> Self {
        Self {
            id,
            sender,
            state: SessionState::Connected,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Display name once joined
    pub fn name(&self) -> Option<&str> {
        match &self.state {
            SessionState::Joined { name } => Some(name),
            _ => None,
        }
    }

    /// Send an event to this session's own connection
    ///
    /// Delivery failures are dropped; the writer task notices a dead socket.
    pub fn notify(&self, event: ServerEvent) {
        if let Err(e) = deliver(&self.sender, event) {
            debug!("Could not notify {}: {}", self.id, e);
        }
    }

    /// Handle a `join` event
    pub fn join(
        &mut self,
        name: String,
        registry: &mut Registry,
        room: &mut Room,
        policy: NamePolicy,
    ) -> Result<(), AppError> {
        match &self.state {
            SessionState::Connected => {}
            SessionState::Joined { name } => return Err(AppError::AlreadyJoined(name.clone())),
            SessionState::Closed => return Err(AppError::SessionClosed),
        }

        if name.trim().is_empty() {
            return Err(AppError::InvalidName);
        }

        if policy == NamePolicy::Reject && registry.contains(&name) {
            return Err(AppError::NameTaken(name));
        }

        // Population before this participant is added
        let online = registry.count();
        self.notify(Envelope::server(format!("There are {} users online", online)).into());

        self.state = SessionState::Joined { name: name.clone() };
        if let Some(previous) = registry.register(name.clone(), self.id) {
            debug!("Name '{}' moved from {} to {}", name, previous, self.id);
        }

        room.join(Participant::new(self.id, name.clone(), self.sender.clone()));
        room.broadcast_others(
            &Envelope::server(format!("{} has joined the room.", name)),
            self.id,
        );

        info!("{} joined {} as '{}'", self.id, room.name, name);

        self.notify(Envelope::server("You joined the room").into());

        Ok(())
    }

    /// Handle a `msg` event
    ///
    /// Returns the number of members the message was queued for.
    pub fn message(&self, msg: String, room: &Room) -> Result<usize, AppError> {
        match &self.state {
            SessionState::Joined { name } => {
                Ok(room.broadcast_all(&Envelope::new(name.clone(), msg)))
            }
            SessionState::Connected => Err(AppError::NotJoined),
            SessionState::Closed => Err(AppError::SessionClosed),
        }
    }

    /// Handle transport disconnect
    ///
    /// Idempotent: closing an already closed session does nothing.
    pub fn disconnect(&mut self, registry: &mut Registry, room: &mut Room) {
        let previous = std::mem::replace(&mut self.state, SessionState::Closed);

        if let SessionState::Joined { name } = previous {
            room.broadcast_others(
                &Envelope::server(format!("{} has left the room.", name)),
                self.id,
            );
            room.leave(self.id);
            registry.unregister_if(&name, self.id);

            info!("{} ('{}') left {}", self.id, name, room.name);
        }
    }
}
