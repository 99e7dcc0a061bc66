//! Error types for saving, loading and reconciling player state.

use std::path::PathBuf;

use thiserror::Error;

/// Failures writing a save file.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("No user id given")]
    NoUser,

    #[error("Failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize save: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failures of session-level save/load operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Save file '{0}' not found")]
    NotFound(String),

    /// Player is missing components needed for a snapshot.
    #[error("Player state incomplete, missing: {}", .0.join(", "))]
    IncompleteState(Vec<&'static str>),

    #[error(transparent)]
    Store(#[from] SaveError),
}

/// Failures applying a pending load after a scene change.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("Player not found after {attempts} attempts")]
    LookupTimeout { attempts: u32 },
}

/// Failures logging a user in.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoginError {
    #[error("Please enter a user name")]
    EmptyUserName,
}
