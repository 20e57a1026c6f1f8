//! Interfaces the pipeline needs from the connection runtime.

use std::collections::HashSet;

use async_trait::async_trait;

use super::command::Privilege;
use super::event::{ConnectionId, ServerEvent};

/// Delivers events to rooms and connections.
#[async_trait]
pub trait ChatRuntime: Send + Sync {
    /// Send an event to every connection in a room.
    ///
    /// Returns the number of connections it was queued for.
    async fn emit_to_room(&self, room: &str, event: ServerEvent) -> usize;

    /// Send an event to one connection.
    ///
    /// Returns false if the connection is gone.
    async fn emit_to_connection(&self, connection: &ConnectionId, event: ServerEvent) -> bool;

    /// Close a connection.
    ///
    /// Returns false if the connection is gone.
    async fn disconnect(&self, connection: &ConnectionId) -> bool;
}

/// Answers who is in a room.
#[async_trait]
pub trait RoomMembership: Send + Sync {
    /// Get the usernames currently in a room.
    async fn members_of(&self, room: &str) -> HashSet<String>;
}

/// Maps usernames to their connection.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Get the connection for a username.
    async fn connection_for(&self, username: &str) -> Option<ConnectionId>;
}

/// Decides whether a user holds a privilege.
pub trait Authorizer: Send + Sync {
    /// Check if `username` holds `privilege`.
    fn is_authorized(&self, username: &str, privilege: Privilege) -> bool;
}

/// Authorizer backed by a fixed list of admin usernames.
///
/// Admins hold every privilege.
#[derive(Debug, Clone, Default)]
pub struct AdminList {
    admins: HashSet<String>,
}

impl AdminList {
    /// Create an authorizer from usernames.
    pub fn new<I, S>(admins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            admins: admins.into_iter().map(Into::into).collect(),
        }
    }
}

impl Authorizer for AdminList {
    fn is_authorized(&self, username: &str, _privilege: Privilege) -> bool {
        self.admins.contains(username)
    }
}
