//! Inbound chat message pipeline.
//!
//! Every inbound message goes through the content stage first:
//! length check, profanity filter, markdown, sanitization, persistence and
//! finally a room broadcast. If the original text starts with the command
//! prefix it is then handed to the command dispatcher as well.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::command::{parse_command, CommandRegistry};
use super::dispatch::{CommandDispatcher, CommandOutcome, DispatchContext};
use super::event::{ConnectionId, ServerEvent};
use super::hub::ChatHub;
use super::message::ChatMessage;
use super::moderation::MutedList;
use super::policy::{ContentPolicy, ProfanityFilter};
use super::runtime::{AdminList, ChatRuntime};
use super::special::SpecialUserRegistry;
use super::store::{MessageStore, StoredMessage};
use crate::config::ChatConfig;
use crate::{HyperChatError, Result};

/// A message received from a connection.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Room the sender is in.
    pub room: String,
    /// Sender's username.
    pub sender: String,
    /// Sender's connection.
    pub connection_id: ConnectionId,
    /// Message payload exactly as received. Only strings are accepted.
    pub raw: Value,
}

impl InboundMessage {
    /// Create an inbound message.
    pub fn new(
        room: impl Into<String>,
        sender: impl Into<String>,
        connection_id: ConnectionId,
        raw: impl Into<Value>,
    ) -> Self {
        Self {
            room: room.into(),
            sender: sender.into(),
            connection_id,
            raw: raw.into(),
        }
    }
}

/// What happened to the content of a message.
#[derive(Debug)]
pub enum ContentOutcome {
    /// The payload was not a string.
    Rejected,
    /// The sender is muted.
    Muted,
    /// The message was too long and a notice was broadcast instead.
    TooLong,
    /// The message was stored and broadcast.
    Broadcast(StoredMessage),
    /// The store failed, so nothing was broadcast.
    PersistFailed(HyperChatError),
}

/// Result of handling one inbound message.
#[derive(Debug)]
pub struct MessageOutcome {
    /// Content stage result.
    pub content: ContentOutcome,
    /// Command stage result, if the message was a command.
    pub command: Option<CommandOutcome>,
}

impl MessageOutcome {
    fn content_only(content: ContentOutcome) -> Self {
        Self {
            content,
            command: None,
        }
    }
}

/// Pipeline limits and names.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Maximum message length in UTF-16 code units.
    pub max_message_length: usize,
    /// Command prefix character.
    pub command_prefix: char,
}

impl PipelineSettings {
    /// Take the settings from the chat configuration.
    pub fn from_config(config: &ChatConfig) -> Self {
        Self {
            max_message_length: config.max_message_length,
            command_prefix: config.command_prefix,
        }
    }

    /// Notice broadcast in place of an over-long message.
    pub fn too_long_notice(&self) -> String {
        format!(
            "This message was removed because it was too long (over {} characters).",
            self.max_message_length
        )
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from_config(&ChatConfig::default())
    }
}

/// The chat message pipeline.
pub struct MessagePipeline {
    settings: PipelineSettings,
    policy: ContentPolicy,
    specials: SpecialUserRegistry,
    muted: Arc<MutedList>,
    store: Arc<dyn MessageStore>,
    runtime: Arc<dyn ChatRuntime>,
    dispatcher: CommandDispatcher,
}

impl MessagePipeline {
    /// Create a pipeline from its collaborators.
    pub fn new(
        settings: PipelineSettings,
        policy: ContentPolicy,
        specials: SpecialUserRegistry,
        muted: Arc<MutedList>,
        store: Arc<dyn MessageStore>,
        runtime: Arc<dyn ChatRuntime>,
        dispatcher: CommandDispatcher,
    ) -> Self {
        Self {
            settings,
            policy,
            specials,
            muted,
            store,
            runtime,
            dispatcher,
        }
    }

    /// Build a pipeline that delivers through `hub`, configured from `config`.
    pub fn from_config(
        config: &ChatConfig,
        hub: Arc<ChatHub>,
        store: Arc<dyn MessageStore>,
    ) -> Result<Self> {
        let muted = Arc::new(MutedList::new());
        let ctx = DispatchContext {
            runtime: hub.clone(),
            membership: hub.clone(),
            directory: hub.clone(),
            authorizer: Arc::new(AdminList::new(config.admins.iter().cloned())),
            muted: muted.clone(),
        };
        let dispatcher =
            CommandDispatcher::new(CommandRegistry::moderation(), ctx, &config.server_name);
        let policy = ContentPolicy::new(ProfanityFilter::with_defaults(&config.blocked_words)?);

        Ok(Self::new(
            PipelineSettings::from_config(config),
            policy,
            SpecialUserRegistry::from_config(&config.special_users),
            muted,
            store,
            hub,
            dispatcher,
        ))
    }

    /// Get the shared muted list.
    pub fn muted(&self) -> &Arc<MutedList> {
        &self.muted
    }

    /// Handle one inbound message.
    pub async fn handle(&self, inbound: &InboundMessage) -> MessageOutcome {
        let Some(raw) = inbound.raw.as_str() else {
            debug!(room = %inbound.room, sender = %inbound.sender, "rejected non-string message");
            return MessageOutcome::content_only(ContentOutcome::Rejected);
        };

        if self.muted.is_muted(&inbound.sender).await {
            debug!(room = %inbound.room, sender = %inbound.sender, "dropped message from muted user");
            return MessageOutcome::content_only(ContentOutcome::Muted);
        }

        if raw.encode_utf16().count() > self.settings.max_message_length {
            let notice = ChatMessage::normal(&inbound.sender, self.settings.too_long_notice());
            self.runtime
                .emit_to_room(&inbound.room, ServerEvent::NewMessage(notice))
                .await;
            return MessageOutcome::content_only(ContentOutcome::TooLong);
        }

        let content = self.publish(inbound, raw).await;

        let command = match parse_command(raw, self.settings.command_prefix) {
            Some(command) => Some(
                self.dispatcher
                    .dispatch(&inbound.sender, &inbound.room, &command)
                    .await,
            ),
            None => None,
        };

        MessageOutcome { content, command }
    }

    /// Render, persist and broadcast a message.
    async fn publish(&self, inbound: &InboundMessage, raw: &str) -> ContentOutcome {
        let html = self.policy.render(raw);
        let record = match self.specials.get(&inbound.sender) {
            Some(special) => ChatMessage::special(special, html),
            None => ChatMessage::normal(&inbound.sender, html),
        };

        let stored = match self.store.create_message(&inbound.room, &record).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!(
                    room = %inbound.room,
                    sender = %inbound.sender,
                    error = %e,
                    "failed to store message, not broadcasting"
                );
                return ContentOutcome::PersistFailed(e);
            }
        };

        self.runtime
            .emit_to_room(&inbound.room, ServerEvent::NewMessage(stored.message.clone()))
            .await;
        ContentOutcome::Broadcast(stored)
    }
}
