//! Database schema and migrations for HyperChat.
//!
//! Migrations are applied in order when the database is opened.
//! The schema_version table tracks which ones have already run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: chat messages
    r#"
CREATE TABLE messages (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    room_id         TEXT NOT NULL,
    username        TEXT NOT NULL,
    message         TEXT NOT NULL,           -- sanitized HTML
    special         INTEGER NOT NULL DEFAULT 0,
    message_type    TEXT NOT NULL DEFAULT 'normal',
    username_color  TEXT,
    badge_color     TEXT,
    created_at      TEXT NOT NULL
);

CREATE INDEX idx_messages_room_created ON messages(room_id, created_at);
"#,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_migration_contains_messages_table() {
        let migration = MIGRATIONS[0];
        assert!(migration.contains("CREATE TABLE messages"));
        assert!(migration.contains("room_id"));
        assert!(migration.contains("username_color"));
        assert!(migration.contains("badge_color"));
    }
}
