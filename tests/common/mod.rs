//! Test helpers for integration tests.
//!
//! Builds a pipeline over a real hub and an in-memory SQLite store.

#![allow(dead_code)]

use std::sync::Arc;

use hyperchat::chat::{ChatHub, ChatMessage, ConnectionId, Outbound, OutboundReceiver};
use hyperchat::config::ChatConfig;
use hyperchat::{Database, InboundMessage, MessageOutcome, MessagePipeline, SqliteMessageStore};

/// The default admin.
pub const ADMIN: &str = "Justsnoopy30";

/// Room used by most tests.
pub const ROOM: &str = "lobby";

/// Pipeline wired to a hub and an in-memory store.
pub struct TestChat {
    pub hub: Arc<ChatHub>,
    pub store: Arc<SqliteMessageStore>,
    pub pipeline: MessagePipeline,
}

/// A connected test user.
pub struct TestUser {
    pub username: String,
    pub room: String,
    pub id: ConnectionId,
    pub rx: OutboundReceiver,
}

impl TestUser {
    /// Drain everything queued for this user.
    pub fn drain(&mut self) -> Vec<Outbound> {
        let mut items = Vec::new();
        while let Ok(item) = self.rx.try_recv() {
            items.push(item);
        }
        items
    }

    /// Drain and keep only chat messages.
    pub fn messages(&mut self) -> Vec<ChatMessage> {
        self.drain()
            .into_iter()
            .filter_map(|item| match item {
                Outbound::Event(event) => event.as_message().cloned(),
                Outbound::Close => None,
            })
            .collect()
    }
}

impl TestChat {
    /// Create a chat with the default configuration.
    pub async fn new() -> Self {
        Self::with_config(ChatConfig::default()).await
    }

    /// Create a chat with the given configuration.
    pub async fn with_config(config: ChatConfig) -> Self {
        let hub = Arc::new(ChatHub::new());
        let store = Arc::new(SqliteMessageStore::new(
            Database::open_in_memory().await.unwrap(),
        ));
        let pipeline = MessagePipeline::from_config(&config, hub.clone(), store.clone()).unwrap();
        Self {
            hub,
            store,
            pipeline,
        }
    }

    /// Connect a user to a room.
    pub async fn connect(&self, username: &str, room: &str) -> TestUser {
        let (id, rx) = self.hub.register(username, room).await;
        TestUser {
            username: username.to_string(),
            room: room.to_string(),
            id,
            rx,
        }
    }

    /// Send a message as `user`.
    pub async fn send(&self, user: &TestUser, raw: impl Into<serde_json::Value>) -> MessageOutcome {
        let inbound = InboundMessage::new(&user.room, &user.username, user.id.clone(), raw);
        self.pipeline.handle(&inbound).await
    }

    /// Count stored messages in a room.
    pub async fn stored(&self, room: &str) -> i64 {
        self.store.repository().count(room).await.unwrap()
    }
}
