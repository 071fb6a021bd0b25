//! Room struct definition
//!
//! A named group of joined connections that receive broadcasts together.
//! Members are keyed by connection, so a connection is in the room at most
//! once no matter how many times it joins.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::SendError;
use crate::message::Envelope;
use crate::participant::Participant;
use crate::types::{ConnectionId, RoomName};

/// Broadcast room
#[derive(Debug)]
pub struct Room {
    /// Room name
    pub name: RoomName,
    /// Current members: ConnectionId -> Participant
    members: HashMap<ConnectionId, Participant>,
}

impl Room {
    /// Create an empty room
    pub fn new(name: RoomName) -> Self {
        Self {
            name,
            members: HashMap::new(),
        }
    }

    /// Add a participant to the room
    ///
    /// Returns false if the connection was already a member; its entry is
    /// replaced rather than duplicated.
    pub fn join(&mut self, participant: Participant) -> bool {
        self.members.insert(participant.id, participant).is_none()
    }

    /// Remove a connection from the room; absent connections are a no-op
    pub fn leave(&mut self, id: ConnectionId) -> Option<Participant> {
        self.members.remove(&id)
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.members.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Display names of current members, sorted
    pub fn member_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.members.values().map(|p| p.name.clone()).collect();
        names.sort();
        names
    }

    /// Deliver an envelope to every member, sender included
    ///
    /// Returns the number of members the envelope was queued for.
    pub fn broadcast_all(&self, envelope: &Envelope) -> usize {
        self.fan_out(envelope, None)
    }

    /// Deliver an envelope to every member except `excluding`
    pub fn broadcast_others(&self, envelope: &Envelope, excluding: ConnectionId) -> usize {
        self.fan_out(envelope, Some(excluding))
    }

    fn fan_out(&self, envelope: &Envelope, excluding: Option<ConnectionId>) -> usize {
        let mut delivered = 0;

        for participant in self.members.values() {
            if Some(participant.id) == excluding {
                continue;
            }

            // A failed delivery only affects its own recipient
            match participant.send(envelope.clone().into()) {
                Ok(()) => delivered += 1,
                Err(SendError::ChannelFull) => {
                    warn!(
                        "Dropping message for {} in {}: outbound queue full",
                        participant.id, self.name
                    );
                }
                Err(SendError::ChannelClosed) => {
                    debug!(
                        "Skipping {} in {}: connection closed",
                        participant.id, self.name
                    );
                }
            }
        }

        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ServerEvent;
    use tokio::sync::mpsc;

    fn participant(name: &str) -> (Participant, mpsc::Receiver<ServerEvent>) {
        let (tx, rx) = mpsc::channel(8);
        (Participant::new(ConnectionId::new(), name.to_string(), tx), rx)
    }

    #[test]
    fn test_room_creation() {
        let room = Room::new(RoomName::default());

        assert_eq!(room.name.0, "room1");
        assert!(room.is_empty());
        assert_eq!(room.len(), 0);
    }

    #[test]
    fn test_join_and_leave() {
        let mut room = Room::new(RoomName::default());
        let (alice, _rx) = participant("Alice");
        let alice_id = alice.id;

        assert!(room.join(alice));
        assert!(room.contains(alice_id));
        assert_eq!(room.member_names(), vec!["Alice".to_string()]);

        let left = room.leave(alice_id).unwrap();
        assert_eq!(left.name, "Alice");
        assert!(room.is_empty());

        // Leaving twice is a no-op
        assert!(room.leave(alice_id).is_none());
    }

    #[test]
    fn test_join_same_connection_twice() {
        let mut room = Room::new(RoomName::default());
        let (alice, _rx) = participant("Alice");

        assert!(room.join(alice.clone()));
        assert!(!room.join(alice));
        assert_eq!(room.len(), 1);
    }

    #[tokio::test]
    async fn test_broadcast_all_includes_sender() {
        let mut room = Room::new(RoomName::default());
        let (alice, mut alice_rx) = participant("Alice");
        let (bob, mut bob_rx) = participant("Bob");
        room.join(alice);
        room.join(bob);

        let envelope = Envelope::new("Alice", "hi");
        assert_eq!(room.broadcast_all(&envelope), 2);

        assert_eq!(alice_rx.recv().await, Some(envelope.clone().into()));
        assert_eq!(bob_rx.recv().await, Some(envelope.into()));
    }

    #[tokio::test]
    async fn test_broadcast_others_skips_excluded() {
        let mut room = Room::new(RoomName::default());
        let (alice, mut alice_rx) = participant("Alice");
        let (bob, mut bob_rx) = participant("Bob");
        let alice_id = alice.id;
        room.join(alice);
        room.join(bob);

        let envelope = Envelope::server("Alice has joined the room.");
        assert_eq!(room.broadcast_others(&envelope, alice_id), 1);

        assert_eq!(bob_rx.recv().await, Some(envelope.into()));
        assert!(alice_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_survives_failed_recipient() {
        let mut room = Room::new(RoomName::default());
        let (alice, alice_rx) = participant("Alice");
        let (bob, mut bob_rx) = participant("Bob");
        let (tx, _carol_rx) = mpsc::channel(1);
        let carol = Participant::new(ConnectionId::new(), "Carol".to_string(), tx);
        room.join(alice);
        room.join(bob);
        room.join(carol.clone());

        // Alice's connection is gone, Carol's queue is full
        drop(alice_rx);
        carol.send(Envelope::server("backlog").into()).unwrap();

        let envelope = Envelope::new("Bob", "still here");
        assert_eq!(room.broadcast_all(&envelope), 1);
        assert_eq!(bob_rx.recv().await, Some(envelope.into()));
    }
}
