//! Runtime errors.

use thiserror::Error;

/// Errors raised by the runtime and the command handler.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Persisting notification state failed.
    #[error("state store: {0}")]
    Persistence(#[from] tube_persistence::PersistenceError),

    /// `shutdown` was called before `start`.
    #[error("poller is not running")]
    NotStarted,

    #[error("poller is already running")]
    AlreadyStarted,

    #[error("shutdown failed: {0}")]
    Shutdown(String),
}

/// Result type for runtime operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;
