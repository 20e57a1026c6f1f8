//! Moderation command dispatcher.
//!
//! Each command runs through three guards in order: the sender must be
//! authorized, the target must be in the sender's room, and the target's
//! connection must still resolve. The first guard that fails broadcasts a
//! server notice to the room and ends the command.

use std::sync::Arc;

use tracing::{debug, info};

use super::command::{CommandRegistry, Effect, ParsedCommand};
use super::event::ServerEvent;
use super::message::ChatMessage;
use super::moderation::MutedList;
use super::runtime::{Authorizer, ChatRuntime, RoomMembership, UserDirectory};

/// Notice for unauthorized senders.
pub const ACCESS_DENIED_NOTICE: &str = "Access Denied.";

/// Notice for targets that are not in the room.
pub const NOT_IN_ROOM_NOTICE: &str = "The user specified in the command is not in the room.";

/// Notice for unknown commands.
pub const INVALID_COMMAND_NOTICE: &str = "Invalid command.";

/// Result of dispatching a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The effect was applied to the target.
    Executed {
        /// Command name.
        command: &'static str,
        /// Target username.
        target: String,
    },
    /// The sender lacks the required privilege.
    AccessDenied,
    /// The target is not in the sender's room.
    TargetNotInRoom,
    /// The target was in the room but its connection is gone.
    TargetDisconnected,
    /// The command name is not registered.
    InvalidCommand,
}

/// Collaborators the dispatcher acts through.
#[derive(Clone)]
pub struct DispatchContext {
    /// Event delivery.
    pub runtime: Arc<dyn ChatRuntime>,
    /// Room membership lookups.
    pub membership: Arc<dyn RoomMembership>,
    /// Username to connection lookups.
    pub directory: Arc<dyn UserDirectory>,
    /// Privilege checks.
    pub authorizer: Arc<dyn Authorizer>,
    /// Shared moderation state.
    pub muted: Arc<MutedList>,
}

/// Executes parsed commands against the registry.
pub struct CommandDispatcher {
    registry: CommandRegistry,
    ctx: DispatchContext,
    server_name: String,
}

impl CommandDispatcher {
    /// Create a dispatcher.
    pub fn new(
        registry: CommandRegistry,
        ctx: DispatchContext,
        server_name: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            ctx,
            server_name: server_name.into(),
        }
    }

    /// Run a command sent by `sender` in `room`.
    pub async fn dispatch(
        &self,
        sender: &str,
        room: &str,
        command: &ParsedCommand,
    ) -> CommandOutcome {
        let Some(spec) = self.registry.get(&command.name) else {
            debug!(room, sender, command = %command.name, "unknown command");
            self.notify(room, INVALID_COMMAND_NOTICE).await;
            return CommandOutcome::InvalidCommand;
        };

        if !self.ctx.authorizer.is_authorized(sender, spec.privilege) {
            info!(room, sender, command = spec.name, "command denied");
            self.notify(room, ACCESS_DENIED_NOTICE).await;
            return CommandOutcome::AccessDenied;
        }

        let target = match command.argument.as_deref() {
            Some(target) if self.ctx.membership.members_of(room).await.contains(target) => target,
            _ => {
                debug!(room, sender, command = spec.name, "command target not in room");
                self.notify(room, NOT_IN_ROOM_NOTICE).await;
                return CommandOutcome::TargetNotInRoom;
            }
        };

        let Some(connection) = self.ctx.directory.connection_for(target).await else {
            debug!(
                room,
                target_user = target,
                command = spec.name,
                "command target has no connection"
            );
            self.notify(room, NOT_IN_ROOM_NOTICE).await;
            return CommandOutcome::TargetDisconnected;
        };

        // Change the muted list before the event goes out, so the target's
        // next message already sees it. `changed` is used to undo it.
        let changed = match spec.effect {
            Effect::Mute => self.ctx.muted.mute(target).await,
            Effect::Unmute => self.ctx.muted.unmute(target).await,
            Effect::Notify | Effect::Kick => false,
        };

        let delivered = self
            .ctx
            .runtime
            .emit_to_connection(&connection, ServerEvent::Target(spec.event))
            .await;
        if !delivered {
            debug!(
                room,
                target_user = target,
                command = spec.name,
                "command target disconnected"
            );
            if changed {
                self.revert(spec.effect, target).await;
            }
            self.notify(room, NOT_IN_ROOM_NOTICE).await;
            return CommandOutcome::TargetDisconnected;
        }

        if spec.effect == Effect::Kick {
            self.ctx.runtime.disconnect(&connection).await;
        }

        info!(room, sender, target_user = target, command = spec.name, "command executed");
        CommandOutcome::Executed {
            command: spec.name,
            target: target.to_string(),
        }
    }

    /// Undo a muted list change for a command that was not delivered.
    async fn revert(&self, effect: Effect, target: &str) {
        match effect {
            Effect::Mute => {
                self.ctx.muted.unmute(target).await;
            }
            Effect::Unmute => {
                self.ctx.muted.mute(target).await;
            }
            Effect::Notify | Effect::Kick => {}
        }
    }

    async fn notify(&self, room: &str, notice: &str) {
        let message = ChatMessage::server(&self.server_name, notice);
        self.ctx
            .runtime
            .emit_to_room(room, ServerEvent::NewMessage(message))
            .await;
    }
}
