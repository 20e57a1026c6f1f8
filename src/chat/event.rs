//! Events emitted to connected clients.
//!
//! Every event goes over the wire as a JSON frame
//! `{"event": <name>, "data": <payload>}`. Targeted moderation events carry no
//! `data`.

use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::message::ChatMessage;

/// Event name for chat broadcasts.
pub const NEW_MESSAGE_EVENT: &str = "new message";

/// Identifier of a single client connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Payload-less event sent to a single connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetEvent {
    /// The client is muted.
    Mute,
    /// The client is unmuted.
    Unmute,
    /// Flip the client's view.
    Flip,
    /// Undo a flip.
    Unflip,
    /// Visual effect.
    Stupidify,
    /// Visual effect.
    Smash,
    /// The client is being kicked; the connection closes next.
    Kick,
    /// Visual effect.
    Stun,
}

impl TargetEvent {
    /// Get the wire event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetEvent::Mute => "mute",
            TargetEvent::Unmute => "unmute",
            TargetEvent::Flip => "flip",
            TargetEvent::Unflip => "unflip",
            TargetEvent::Stupidify => "stupidify",
            TargetEvent::Smash => "smash",
            TargetEvent::Kick => "kick",
            TargetEvent::Stun => "stun",
        }
    }
}

impl fmt::Display for TargetEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An event delivered to one or more connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// A chat message or server notice for a room.
    NewMessage(ChatMessage),
    /// A moderation event for one connection.
    Target(TargetEvent),
    /// Heartbeat reply.
    Pong,
}

impl ServerEvent {
    /// Get the wire event name.
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::NewMessage(_) => NEW_MESSAGE_EVENT,
            ServerEvent::Target(event) => event.as_str(),
            ServerEvent::Pong => "pong",
        }
    }

    /// Get the chat message, if this is a `new message` event.
    pub fn as_message(&self) -> Option<&ChatMessage> {
        match self {
            ServerEvent::NewMessage(msg) => Some(msg),
            _ => None,
        }
    }
}

impl Serialize for ServerEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ServerEvent::NewMessage(msg) => {
                let mut frame = serializer.serialize_struct("ServerEvent", 2)?;
                frame.serialize_field("event", self.name())?;
                frame.serialize_field("data", msg)?;
                frame.end()
            }
            _ => {
                let mut frame = serializer.serialize_struct("ServerEvent", 1)?;
                frame.serialize_field("event", self.name())?;
                frame.end()
            }
        }
    }
}
