//! Error types for the Discord front end.

use thiserror::Error;

/// Errors that can occur while running the bot.
#[derive(Debug, Error)]
pub enum DiscordError {
    /// The bot token was rejected at startup.
    #[error("Discord login failed: {0}")]
    LoginFailed(String),

    /// Chat API error.
    #[error("Discord API error: {0}")]
    Chat(#[from] tube_core::ChatError),

    /// Video platform client could not be built.
    #[error("video source error: {0}")]
    Source(#[from] tube_core::SourceError),

    /// Runtime lifecycle error.
    #[error("runtime error: {0}")]
    Runtime(#[from] tube_runtime::RuntimeError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for bot operations.
pub type Result<T> = std::result::Result<T, DiscordError>;
