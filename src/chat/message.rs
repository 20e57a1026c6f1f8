//! Chat message record.
//!
//! A `ChatMessage` is what gets persisted and what is broadcast to a room
//! under the `new message` event.

use serde::{Deserialize, Serialize};

use super::special::SpecialUser;

/// Message type used for regular users.
pub const NORMAL_TYPE: &str = "normal";

/// Message type used for server notices.
pub const SERVER_TYPE: &str = "Server";

/// A chat message as persisted and broadcast.
///
/// Non-special messages never carry colors. Messages from special users
/// always carry both colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Sender's username.
    #[serde(rename = "username")]
    pub user: String,
    /// Sanitized HTML content.
    pub message: String,
    /// Whether the sender is a special user or the server.
    pub special: bool,
    /// "normal", a special user's role, or "Server".
    #[serde(rename = "type")]
    pub kind: String,
    /// Username color for special users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_color: Option<String>,
    /// Badge color for special users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge_color: Option<String>,
}

impl ChatMessage {
    /// Create a message from a regular user.
    pub fn normal(user: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            message: message.into(),
            special: false,
            kind: NORMAL_TYPE.to_string(),
            username_color: None,
            badge_color: None,
        }
    }

    /// Create a message from a special user, tagged with their badge.
    pub fn special(special_user: &SpecialUser, message: impl Into<String>) -> Self {
        Self {
            user: special_user.username.clone(),
            message: message.into(),
            special: true,
            kind: special_user.kind.clone(),
            username_color: Some(special_user.username_color.clone()),
            badge_color: Some(special_user.badge_color.clone()),
        }
    }

    /// Create a server notice.
    pub fn server(server_name: impl Into<String>, notice: impl Into<String>) -> Self {
        Self {
            user: server_name.into(),
            message: notice.into(),
            special: true,
            kind: SERVER_TYPE.to_string(),
            username_color: None,
            badge_color: None,
        }
    }

    /// Check if this is a server notice.
    pub fn is_server_notice(&self) -> bool {
        self.special && self.kind == SERVER_TYPE
    }
}
