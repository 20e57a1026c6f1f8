//! In-process connection hub.
//!
//! The hub tracks every live connection, which room it is in, and which
//! connection currently belongs to each username. It implements the runtime,
//! membership and directory interfaces used by the pipeline.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

use super::event::{ConnectionId, ServerEvent};
use super::runtime::{ChatRuntime, RoomMembership, UserDirectory};

/// Item queued for a connection's writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Send an event frame.
    Event(ServerEvent),
    /// Close the connection.
    Close,
}

/// Receiving half of a connection's outbound queue.
pub type OutboundReceiver = mpsc::UnboundedReceiver<Outbound>;

/// A registered connection.
#[derive(Debug)]
struct Connection {
    username: String,
    room: String,
    sender: mpsc::UnboundedSender<Outbound>,
}

#[derive(Debug, Default)]
struct HubState {
    connections: HashMap<ConnectionId, Connection>,
    /// Usernames present in each room.
    rooms: HashMap<String, HashSet<String>>,
    /// Most recent connection of each username.
    users: HashMap<String, ConnectionId>,
}

impl HubState {
    fn has_other_connection(&self, username: &str, room: &str) -> bool {
        self.connections
            .values()
            .any(|c| c.username == username && c.room == room)
    }
}

/// Hub of live connections.
#[derive(Debug, Default)]
pub struct ChatHub {
    state: RwLock<HubState>,
}

impl ChatHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection for `username` in `room`.
    ///
    /// If the username is already connected, the new connection becomes the
    /// one targeted by moderation commands.
    pub async fn register(
        &self,
        username: impl Into<String>,
        room: impl Into<String>,
    ) -> (ConnectionId, OutboundReceiver) {
        let username = username.into();
        let room = room.into();
        let id = ConnectionId::generate();
        let (sender, receiver) = mpsc::unbounded_channel();

        let mut state = self.state.write().await;
        state
            .rooms
            .entry(room.clone())
            .or_default()
            .insert(username.clone());
        state.users.insert(username.clone(), id.clone());
        state.connections.insert(
            id.clone(),
            Connection {
                username,
                room,
                sender,
            },
        );

        (id, receiver)
    }

    /// Remove a connection.
    ///
    /// Returns true if the connection was registered.
    pub async fn unregister(&self, id: &ConnectionId) -> bool {
        let mut state = self.state.write().await;
        let Some(conn) = state.connections.remove(id) else {
            return false;
        };

        if state.users.get(&conn.username) == Some(id) {
            // Fall back to another live connection of the same user.
            let replacement = state
                .connections
                .iter()
                .find(|(_, c)| c.username == conn.username)
                .map(|(other, _)| other.clone());
            match replacement {
                Some(other) => {
                    state.users.insert(conn.username.clone(), other);
                }
                None => {
                    state.users.remove(&conn.username);
                }
            }
        }

        if !state.has_other_connection(&conn.username, &conn.room) {
            if let Some(members) = state.rooms.get_mut(&conn.room) {
                members.remove(&conn.username);
                if members.is_empty() {
                    state.rooms.remove(&conn.room);
                }
            }
        }

        debug!(connection = %id, user = %conn.username, room = %conn.room, "connection removed");
        true
    }

    /// Check if a connection is registered.
    pub async fn is_connected(&self, id: &ConnectionId) -> bool {
        self.state.read().await.connections.contains_key(id)
    }

    /// Get the number of live connections.
    pub async fn connection_count(&self) -> usize {
        self.state.read().await.connections.len()
    }
}

#[async_trait]
impl ChatRuntime for ChatHub {
    async fn emit_to_room(&self, room: &str, event: ServerEvent) -> usize {
        let state = self.state.read().await;
        state
            .connections
            .values()
            .filter(|c| c.room == room)
            .filter(|c| c.sender.send(Outbound::Event(event.clone())).is_ok())
            .count()
    }

    async fn emit_to_connection(&self, connection: &ConnectionId, event: ServerEvent) -> bool {
        let state = self.state.read().await;
        match state.connections.get(connection) {
            Some(c) => c.sender.send(Outbound::Event(event)).is_ok(),
            None => false,
        }
    }

    async fn disconnect(&self, connection: &ConnectionId) -> bool {
        let delivered = {
            let state = self.state.read().await;
            match state.connections.get(connection) {
                Some(c) => c.sender.send(Outbound::Close).is_ok(),
                None => return false,
            }
        };
        self.unregister(connection).await;
        delivered
    }
}

#[async_trait]
impl RoomMembership for ChatHub {
    async fn members_of(&self, room: &str) -> HashSet<String> {
        self.state
            .read()
            .await
            .rooms
            .get(room)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl UserDirectory for ChatHub {
    async fn connection_for(&self, username: &str) -> Option<ConnectionId> {
        self.state.read().await.users.get(username).cloned()
    }
}
