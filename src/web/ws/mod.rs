//! WebSocket module for real-time chat.
//!
//! Each socket is one connection registered with the chat hub. Inbound
//! frames go through the message pipeline, outbound events are written
//! back as JSON text frames.

pub mod chat;
pub mod messages;

pub use chat::{chat_ws_handler, ChatWsState, WsQuery};
pub use messages::{event_frame, ClientMessage};
