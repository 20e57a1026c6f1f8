//! Chat message persistence.
//!
//! Messages are append-only: they are created once and never updated.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::message::ChatMessage;
use crate::db::{Database, DbPool};
use crate::Result;

/// A message as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    /// Row ID.
    pub id: i64,
    /// Room the message was sent to.
    pub room_id: String,
    /// The message fields.
    pub message: ChatMessage,
    /// Timestamp when the message was stored.
    pub created_at: DateTime<Utc>,
}

/// Persistence store for chat messages.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist a message. Makes a single attempt.
    async fn create_message(&self, room: &str, message: &ChatMessage) -> Result<StoredMessage>;
}

/// Database row type for messages.
#[derive(sqlx::FromRow)]
struct MessageRow {
    id: i64,
    room_id: String,
    username: String,
    message: String,
    special: bool,
    message_type: String,
    username_color: Option<String>,
    badge_color: Option<String>,
    created_at: String,
}

impl From<MessageRow> for StoredMessage {
    fn from(row: MessageRow) -> Self {
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Self {
            id: row.id,
            room_id: row.room_id,
            message: ChatMessage {
                user: row.username,
                message: row.message,
                special: row.special,
                kind: row.message_type,
                username_color: row.username_color,
                badge_color: row.badge_color,
            },
            created_at,
        }
    }
}

/// Repository for message rows.
pub struct MessageRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> MessageRepository<'a> {
    /// Create a new MessageRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert a message and return the stored row.
    pub async fn create(&self, room_id: &str, message: &ChatMessage) -> Result<StoredMessage> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages
                (room_id, username, message, special, message_type, username_color, badge_color, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, room_id, username, message, special, message_type,
                      username_color, badge_color, created_at
            "#,
        )
        .bind(room_id)
        .bind(&message.user)
        .bind(&message.message)
        .bind(message.special)
        .bind(&message.kind)
        .bind(&message.username_color)
        .bind(&message.badge_color)
        .bind(Utc::now().to_rfc3339())
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Get a message by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<StoredMessage>> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, room_id, username, message, special, message_type,
                   username_color, badge_color, created_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(StoredMessage::from))
    }

    /// Get recent messages for a room, oldest first.
    pub async fn recent(&self, room_id: &str, limit: usize) -> Result<Vec<StoredMessage>> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, room_id, username, message, special, message_type,
                   username_color, badge_color, created_at
            FROM messages
            WHERE room_id = $1
            ORDER BY id DESC
            LIMIT $2
            "#,
        )
        .bind(room_id)
        .bind(limit as i64)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(StoredMessage::from).rev().collect())
    }

    /// Count messages in a room.
    pub async fn count(&self, room_id: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE room_id = $1")
            .bind(room_id)
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

/// `MessageStore` backed by the SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteMessageStore {
    db: Database,
}

impl SqliteMessageStore {
    /// Create a store over an open database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Get a repository over the store's pool.
    pub fn repository(&self) -> MessageRepository<'_> {
        MessageRepository::new(self.db.pool())
    }
}

#[async_trait]
impl MessageStore for SqliteMessageStore {
    async fn create_message(&self, room: &str, message: &ChatMessage) -> Result<StoredMessage> {
        self.repository().create(room, message).await
    }
}
