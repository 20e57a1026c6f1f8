//! Moderation command parser and registry.
//!
//! A command is a message that starts with the prefix character, for example
//! `/mute alice`. The text after the prefix is split once: the first run of
//! non-whitespace characters is the command name, and everything after the
//! following whitespace character is a single argument.

use std::collections::HashMap;

use super::event::TargetEvent;

/// Default command prefix.
pub const DEFAULT_PREFIX: char = '/';

/// A command split into its name and optional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Command name.
    pub name: String,
    /// Everything after the first whitespace character, untrimmed.
    pub argument: Option<String>,
}

/// Parse a raw message as a command.
///
/// Returns None if the message does not start with `prefix`.
pub fn parse_command(raw: &str, prefix: char) -> Option<ParsedCommand> {
    let body = raw.strip_prefix(prefix)?;

    let split = body
        .char_indices()
        .find(|(_, c)| c.is_whitespace())
        .filter(|(pos, _)| *pos > 0);

    let command = match split {
        Some((pos, ws)) => ParsedCommand {
            name: body[..pos].to_string(),
            argument: Some(body[pos + ws.len_utf8()..].to_string()),
        },
        None => ParsedCommand {
            name: body.to_string(),
            argument: None,
        },
    };

    Some(command)
}

/// Privilege required to run a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Privilege {
    /// Room moderation.
    Moderator,
}

/// What a command does to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Add the target to the muted list.
    Mute,
    /// Remove the target from the muted list.
    Unmute,
    /// Only notify the target.
    Notify,
    /// Notify the target, then close its connection.
    Kick,
}

/// Registry entry for a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    /// Command name as typed after the prefix.
    pub name: &'static str,
    /// Privilege required to run it.
    pub privilege: Privilege,
    /// Side effect on the target.
    pub effect: Effect,
    /// Event sent to the target's connection.
    pub event: TargetEvent,
}

/// The moderation commands.
pub const MODERATION_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "mute",
        privilege: Privilege::Moderator,
        effect: Effect::Mute,
        event: TargetEvent::Mute,
    },
    CommandSpec {
        name: "unmute",
        privilege: Privilege::Moderator,
        effect: Effect::Unmute,
        event: TargetEvent::Unmute,
    },
    CommandSpec {
        name: "flip",
        privilege: Privilege::Moderator,
        effect: Effect::Notify,
        event: TargetEvent::Flip,
    },
    CommandSpec {
        name: "unflip",
        privilege: Privilege::Moderator,
        effect: Effect::Notify,
        event: TargetEvent::Unflip,
    },
    CommandSpec {
        name: "stupidify",
        privilege: Privilege::Moderator,
        effect: Effect::Notify,
        event: TargetEvent::Stupidify,
    },
    CommandSpec {
        name: "smash",
        privilege: Privilege::Moderator,
        effect: Effect::Notify,
        event: TargetEvent::Smash,
    },
    CommandSpec {
        name: "kick",
        privilege: Privilege::Moderator,
        effect: Effect::Kick,
        event: TargetEvent::Kick,
    },
    CommandSpec {
        name: "stun",
        privilege: Privilege::Moderator,
        effect: Effect::Notify,
        event: TargetEvent::Stun,
    },
];

/// Lookup table from command name to its spec.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandSpec>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn empty() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Create a registry with the moderation commands.
    pub fn moderation() -> Self {
        let mut registry = Self::empty();
        for spec in MODERATION_COMMANDS {
            registry.register(*spec);
        }
        registry
    }

    /// Add or replace a command.
    pub fn register(&mut self, spec: CommandSpec) {
        self.commands.insert(spec.name, spec);
    }

    /// Look up a command by exact name.
    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(name)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::moderation()
    }
}
