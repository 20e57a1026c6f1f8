//! Error types for HyperChat.

use thiserror::Error;

/// Common error type for HyperChat.
#[derive(Error, Debug)]
pub enum HyperChatError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Validation error for user input or configuration values.
    #[error("validation error: {0}")]
    Validation(String),

}

impl From<sqlx::Error> for HyperChatError {
    fn from(e: sqlx::Error) -> Self {
        HyperChatError::Database(e.to_string())
    }
}

/// Result type alias for HyperChat operations.
pub type Result<T> = std::result::Result<T, HyperChatError>;
