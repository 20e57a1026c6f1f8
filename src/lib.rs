//! HyperChat - chat room message pipeline
//!
//! Messages sent to a room are filtered, rendered from markdown, sanitized,
//! stored and broadcast. Admins moderate rooms with slash commands.

pub mod chat;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod web;

pub use chat::{
    ChatHub, ChatMessage, CommandOutcome, ContentOutcome, InboundMessage, MessageOutcome,
    MessagePipeline, MutedList, ServerEvent, SqliteMessageStore,
};
pub use config::Config;
pub use db::Database;
pub use error::{HyperChatError, Result};
pub use web::WebServer;
