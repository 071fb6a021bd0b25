//! RelayServer Actor implementation
//!
//! The central actor that owns all shared state: the registry, the room and
//! one session per connection. Commands are processed one at a time, so
//! join/leave/broadcast never interleave.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::NamePolicy;
use crate::error::AppError;
use crate::message::ServerEvent;
use crate::registry::Registry;
use crate::room::Room;
use crate::session::Session;
use crate::types::{ConnectionId, RoomName};

/// Commands sent from handlers to the RelayServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New connection accepted
    Connect {
        conn_id: ConnectionId,
        sender: mpsc::Sender<ServerEvent>,
    },
    /// `join` event
    Join {
        conn_id: ConnectionId,
        name: String,
    },
    /// `msg` event
    Message {
        conn_id: ConnectionId,
        msg: String,
    },
    /// Connection closed
    Disconnect {
        conn_id: ConnectionId,
    },
}

/// The main RelayServer actor
pub struct RelayServer {
    /// Name → connection lookup
    registry: Registry,
    /// The shared room
    room: Room,
    /// All open connections: ConnectionId -> Session
    sessions: HashMap<ConnectionId, Session>,
    /// Duplicate-name handling
    name_policy: NamePolicy,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl RelayServer {
    /// Create a RelayServer with the default room and name policy
    pub fn new(receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self::with_policy(receiver, NamePolicy::default())
    }

    /// Create a RelayServer with an explicit duplicate-name policy
    pub fn with_policy(receiver: mpsc::Receiver<ServerCommand>, name_policy: NamePolicy) -> Self {
        Self {
            registry: Registry::new(),
            room: Room::new(RoomName::default()),
            sessions: HashMap::new(),
            name_policy,
            receiver,
        }
    }

    /// Run the RelayServer event loop
    ///
    /// Continuously receives and processes commands until all senders are dropped.
    pub async fn run(mut self) {
        info!("RelayServer started (room {})", self.room.name);

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("RelayServer shutting down");
    }

    /// Process a single command
    fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Connect { conn_id, sender } => {
                self.handle_connect(conn_id, sender);
            }
            ServerCommand::Join { conn_id, name } => {
                self.handle_join(conn_id, name);
            }
            ServerCommand::Message { conn_id, msg } => {
                self.handle_message(conn_id, msg);
            }
            ServerCommand::Disconnect { conn_id } => {
                self.handle_disconnect(conn_id);
            }
        }
    }

    /// Handle new connection
    fn handle_connect(&mut self, conn_id: ConnectionId, sender: mpsc::Sender<ServerEvent>) {
        debug!("Connection {} opened", conn_id);
        self.sessions.insert(conn_id, Session::new(conn_id, sender));
        self.log_totals();
    }

    /// Handle `join`
    fn handle_join(&mut self, conn_id: ConnectionId, name: String) {
        let Some(session) = self.sessions.get_mut(&conn_id) else {
            return;
        };

        if let Err(e) = session.join(name, &mut self.registry, &mut self.room, self.name_policy) {
            warn!("Rejected join from {}: {}", conn_id, e);
            session.notify(e.into());
        }
        self.log_totals();
    }

    /// Handle `msg`
    fn handle_message(&mut self, conn_id: ConnectionId, msg: String) {
        let Some(session) = self.sessions.get(&conn_id) else {
            return;
        };

        match session.message(msg, &self.room) {
            Ok(delivered) => debug!("Message from {} delivered to {}", conn_id, delivered),
            Err(e) => {
                warn!("Rejected message from {}: {}", conn_id, e);
                session.notify(e.into());
            }
        }
    }

    /// Handle connection close
    fn handle_disconnect(&mut self, conn_id: ConnectionId) {
        let Some(mut session) = self.sessions.remove(&conn_id) else {
            return;
        };

        session.disconnect(&mut self.registry, &mut self.room);
        debug!("Connection {} closed", conn_id);
        self.log_totals();
    }

    fn log_totals(&self) {
        debug!(
            "Total connections: {}, registered names: {}, room members: {}",
            self.sessions.len(),
            self.registry.count(),
            self.room.len()
        );
    }
}

/// Send a command to the actor, mapping a closed channel to `ChannelSend`
pub async fn send_command(
    cmd_tx: &mpsc::Sender<ServerCommand>,
    cmd: ServerCommand,
) -> Result<(), AppError> {
    cmd_tx.send(cmd).await.map_err(|_| AppError::ChannelSend)
}
