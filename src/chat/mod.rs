//! Chat module for HyperChat.
//!
//! This module provides the room message pipeline:
//! - Content policy (profanity filter, markdown, HTML sanitization)
//! - Persistence of rendered messages
//! - Room broadcast through a connection hub
//! - Moderation commands (`/mute`, `/kick`, ...) and the muted list

mod command;
mod dispatch;
mod event;
mod hub;
mod message;
mod moderation;
mod pipeline;
mod policy;
mod runtime;
mod special;
mod store;

pub use command::{
    parse_command, CommandRegistry, CommandSpec, Effect, ParsedCommand, Privilege,
    DEFAULT_PREFIX, MODERATION_COMMANDS,
};
pub use dispatch::{
    CommandDispatcher, CommandOutcome, DispatchContext, ACCESS_DENIED_NOTICE,
    INVALID_COMMAND_NOTICE, NOT_IN_ROOM_NOTICE,
};
pub use event::{ConnectionId, ServerEvent, TargetEvent, NEW_MESSAGE_EVENT};
pub use hub::{ChatHub, Outbound, OutboundReceiver};
pub use message::{ChatMessage, NORMAL_TYPE, SERVER_TYPE};
pub use moderation::MutedList;
pub use pipeline::{
    ContentOutcome, InboundMessage, MessageOutcome, MessagePipeline, PipelineSettings,
};
pub use policy::{
    render_markdown, sanitize_html, ContentPolicy, ProfanityFilter, DEFAULT_BLOCKED_WORDS,
};
pub use runtime::{AdminList, Authorizer, ChatRuntime, RoomMembership, UserDirectory};
pub use special::{SpecialUser, SpecialUserRegistry};
pub use store::{MessageRepository, MessageStore, SqliteMessageStore, StoredMessage};
