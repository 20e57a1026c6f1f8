//! Configuration module for HyperChat.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use crate::{HyperChatError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/hyperchat.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Console only when unset or empty.
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> Option<String> {
    Some("logs/hyperchat.log".to_string())
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// A user shown with a badge and colored name.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SpecialUserConfig {
    /// Exact username to match.
    pub username: String,
    /// Role label shown on the badge (e.g., "Owner").
    #[serde(rename = "type")]
    pub kind: String,
    /// Username color (CSS color).
    pub username_color: String,
    /// Badge color (CSS color).
    pub badge_color: String,
}

impl SpecialUserConfig {
    fn new(username: &str, kind: &str, username_color: &str, badge_color: &str) -> Self {
        Self {
            username: username.to_string(),
            kind: kind.to_string(),
            username_color: username_color.to_string(),
            badge_color: badge_color.to_string(),
        }
    }
}

/// Chat pipeline configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Messages longer than this (in UTF-16 code units) are replaced by a notice.
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
    /// Character that starts a moderation command.
    #[serde(default = "default_command_prefix")]
    pub command_prefix: char,
    /// Sender name used for server notices.
    #[serde(default = "default_server_name")]
    pub server_name: String,
    /// Usernames allowed to run moderation commands.
    #[serde(default = "default_admins")]
    pub admins: Vec<String>,
    /// Words masked in addition to the built-in list.
    #[serde(default)]
    pub blocked_words: Vec<String>,
    /// Users with badges.
    #[serde(default = "default_special_users")]
    pub special_users: Vec<SpecialUserConfig>,
}

fn default_max_message_length() -> usize {
    2000
}

fn default_command_prefix() -> char {
    '/'
}

fn default_server_name() -> String {
    "HyperChat".to_string()
}

fn default_admins() -> Vec<String> {
    vec!["Justsnoopy30".to_string()]
}

fn default_special_users() -> Vec<SpecialUserConfig> {
    vec![
        SpecialUserConfig::new("Justsnoopy30", "Owner", "#00b0f4", "#7289da"),
        SpecialUserConfig::new("kmisterk", "Helper", "#00b0f4", "#691785"),
    ]
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_message_length: default_max_message_length(),
            command_prefix: default_command_prefix(),
            server_name: default_server_name(),
            admins: default_admins(),
            blocked_words: Vec::new(),
            special_users: default_special_users(),
        }
    }
}

/// Web front end configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Whether to serve static files.
    #[serde(default = "default_serve_static")]
    pub serve_static: bool,
    /// Path to static files directory.
    #[serde(default = "default_static_path")]
    pub static_path: String,
    /// CORS allowed origins. Any origin when empty.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_serve_static() -> bool {
    true
}

fn default_static_path() -> String {
    "public".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            serve_static: default_serve_static(),
            static_path: default_static_path(),
            cors_origins: vec![],
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Chat pipeline configuration.
    #[serde(default)]
    pub chat: ChatConfig,
    /// Web front end configuration.
    #[serde(default)]
    pub web: WebConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(HyperChatError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| HyperChatError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `HYPERCHAT_ADMINS`: comma-separated list of privileged usernames
    /// - `HYPERCHAT_DATABASE_PATH`: database file path
    /// - `HYPERCHAT_LOG_LEVEL`: log level
    pub fn apply_env_overrides(&mut self) {
        if let Ok(admins) = std::env::var("HYPERCHAT_ADMINS") {
            let admins: Vec<String> = admins
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
            if !admins.is_empty() {
                self.chat.admins = admins;
            }
        }

        if let Ok(path) = std::env::var("HYPERCHAT_DATABASE_PATH") {
            if !path.is_empty() {
                self.database.path = path;
            }
        }

        if let Ok(level) = std::env::var("HYPERCHAT_LOG_LEVEL") {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        let chat = &self.chat;

        if chat.max_message_length == 0 {
            return Err(HyperChatError::Validation(
                "chat.max_message_length must be greater than zero".to_string(),
            ));
        }
        if chat.command_prefix.is_whitespace() {
            return Err(HyperChatError::Validation(
                "chat.command_prefix must not be whitespace".to_string(),
            ));
        }
        if chat.server_name.trim().is_empty() {
            return Err(HyperChatError::Validation(
                "chat.server_name must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for user in &chat.special_users {
            if !seen.insert(user.username.as_str()) {
                return Err(HyperChatError::Validation(format!(
                    "special user {} is listed more than once",
                    user.username
                )));
            }
            if user.kind.is_empty() || user.username_color.is_empty() || user.badge_color.is_empty()
            {
                return Err(HyperChatError::Validation(format!(
                    "special user {} needs a type, username_color and badge_color",
                    user.username
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);

        assert_eq!(config.database.path, "data/hyperchat.db");

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file.as_deref(), Some("logs/hyperchat.log"));

        assert_eq!(config.chat.max_message_length, 2000);
        assert_eq!(config.chat.command_prefix, '/');
        assert_eq!(config.chat.server_name, "HyperChat");
        assert_eq!(config.chat.admins, vec!["Justsnoopy30".to_string()]);
        assert!(config.chat.blocked_words.is_empty());
        assert_eq!(config.chat.special_users.len(), 2);
        assert_eq!(config.chat.special_users[0].username, "Justsnoopy30");
        assert_eq!(config.chat.special_users[0].kind, "Owner");
        assert_eq!(config.chat.special_users[1].username, "kmisterk");
        assert_eq!(config.chat.special_users[1].badge_color, "#691785");

        assert!(config.web.serve_static);
        assert_eq!(config.web.static_path, "public");
        assert!(config.web.cors_origins.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r##"
[server]
host = "127.0.0.1"
port = 8080

[database]
path = "custom/chat.sqlite"

[logging]
level = "debug"
file = "custom/logs/chat.log"

[chat]
max_message_length = 500
command_prefix = "!"
server_name = "Bot"
admins = ["alice", "bob"]
blocked_words = ["heck"]

[[chat.special_users]]
username = "alice"
type = "Admin"
username_color = "#ff0000"
badge_color = "#00ff00"

[web]
serve_static = false
static_path = "dist"
cors_origins = ["http://localhost:5173"]
"##;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.path, "custom/chat.sqlite");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file.as_deref(), Some("custom/logs/chat.log"));

        assert_eq!(config.chat.max_message_length, 500);
        assert_eq!(config.chat.command_prefix, '!');
        assert_eq!(config.chat.server_name, "Bot");
        assert_eq!(config.chat.admins, vec!["alice", "bob"]);
        assert_eq!(config.chat.blocked_words, vec!["heck"]);
        assert_eq!(
            config.chat.special_users,
            vec![SpecialUserConfig::new("alice", "Admin", "#ff0000", "#00ff00")]
        );

        assert!(!config.web.serve_static);
        assert_eq!(config.web.static_path, "dist");
        assert_eq!(config.web.cors_origins, vec!["http://localhost:5173"]);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[chat]
server_name = "Partial"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.chat.server_name, "Partial");
        assert_eq!(config.chat.max_message_length, 2000);
        assert_eq!(config.chat.special_users.len(), 2);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.path, "data/hyperchat.db");
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        if let Err(HyperChatError::Config(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");
        assert!(matches!(result, Err(HyperChatError::Io(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 4000\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn test_load_with_env_applies_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[database]\npath = \"file.db\"\n").unwrap();
        let original = std::env::var("HYPERCHAT_DATABASE_PATH").ok();

        std::env::set_var("HYPERCHAT_DATABASE_PATH", "override.db");
        let config = Config::load_with_env(&path).unwrap();
        assert_eq!(config.database.path, "override.db");

        if let Some(val) = original {
            std::env::set_var("HYPERCHAT_DATABASE_PATH", val);
        } else {
            std::env::remove_var("HYPERCHAT_DATABASE_PATH");
        }
    }

    #[test]
    fn test_apply_env_overrides() {
        let original = std::env::var("HYPERCHAT_ADMINS").ok();

        std::env::set_var("HYPERCHAT_ADMINS", "alice, bob ,,");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.chat.admins, vec!["alice", "bob"]);

        std::env::set_var("HYPERCHAT_ADMINS", " , ");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.chat.admins, vec!["Justsnoopy30"]);

        if let Some(val) = original {
            std::env::set_var("HYPERCHAT_ADMINS", val);
        } else {
            std::env::remove_var("HYPERCHAT_ADMINS");
        }
    }

    #[test]
    fn test_validate_default() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_length() {
        let mut config = Config::default();
        config.chat.max_message_length = 0;
        assert!(matches!(
            config.validate(),
            Err(HyperChatError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_whitespace_prefix() {
        let mut config = Config::default();
        config.chat.command_prefix = ' ';
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_server_name() {
        let mut config = Config::default();
        config.chat.server_name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_duplicate_special_user() {
        let mut config = Config::default();
        let first = config.chat.special_users[0].clone();
        config.chat.special_users.push(first);

        if let Err(HyperChatError::Validation(msg)) = config.validate() {
            assert!(msg.contains("Justsnoopy30"));
        } else {
            panic!("Expected Validation error");
        }
    }

    #[test]
    fn test_validate_special_user_missing_color() {
        let mut config = Config::default();
        config.chat.special_users[1].badge_color.clear();
        assert!(config.validate().is_err());
    }
}
