//! Persistence errors.

use std::path::PathBuf;
use thiserror::Error;

/// Failure reading or writing the state file.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The state file exists but could not be read.
    #[error("cannot read state file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Staging, syncing or renaming the new state file failed.
    #[error("cannot write state file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File contents are not valid JSON for the expected shape.
    #[error("corrupt state file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot encode state: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// The state directory could not be created.
    #[error("cannot create state directory {path}: {source}")]
    DirectoryError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, PersistenceError>;
