//! Error types for planedit_core operations.

use thiserror::Error;

/// Core error type for editing-session operations.
///
/// Expected conditions such as a blocked validation gate or a commit that is
/// already in flight are not errors; they are reported through
/// [`CommitGate`](crate::CommitGate) and the session's state flags.
#[derive(Error, Debug)]
pub enum EditError {
    /// The initial item fetch was rejected.
    #[error("failed to load {item_type} {item_id}: {reason}")]
    LoadFailed {
        /// Type of the item being loaded
        item_type: String,
        /// Identifier of the item being loaded
        item_id: String,
        /// Reason reported by the loader
        reason: String,
    },

    /// The persistence collaborator rejected a commit.
    #[error("{kind} failed: {reason}")]
    CommitFailed {
        /// Which commit operation failed
        kind: String,
        /// Reason reported by the collaborator
        reason: String,
    },

    /// A remote collaborator rejected a call.
    #[error("{operation} rejected: {message}")]
    Remote {
        /// Operation name (load, save, post, unpost)
        operation: String,
        /// Message returned by the collaborator
        message: String,
    },

    /// Invalid session state transition.
    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        /// Source state
        from: String,
        /// Target state
        to: String,
    },

    /// No commit is awaiting completion.
    #[error("no commit in flight")]
    NoCommitInFlight,

    /// The chosen cancel continuation was not offered by the prompt.
    #[error("cancel choice not available: {0}")]
    ChoiceUnavailable(String),

    /// Autosave storage backend failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Stored data uses a schema this build does not understand.
    #[error("schema version mismatch: found {found}, expected {expected}")]
    SchemaMismatch {
        /// Version found on disk
        found: u32,
        /// Version this build writes
        expected: u32,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Configuration error (loading, parsing, invalid values).
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EditError {
    /// Builds a [`EditError::Remote`] for collaborator implementations.
    pub fn remote(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Returns a user-friendly recovery suggestion for the error, if available.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::CommitFailed { .. } => {
                Some("Unsaved edits are kept in the session. Retry the operation.")
            }
            Self::LoadFailed { .. } => Some("Check the item still exists, then reopen it."),
            Self::SchemaMismatch { .. } => Some(
                "The autosave database was written by another version. Run 'planedit autosave clear' to reset it.",
            ),
            Self::Storage(_) => {
                Some("Autosave is best-effort; editing continues but recovery may be incomplete.")
            }
            Self::ConfigError(_) => Some("Fix or remove planedit.toml to fall back to defaults."),
            _ => None,
        }
    }
}

/// Convenience Result type for planedit_core operations.
pub type Result<T> = std::result::Result<T, EditError>;

/// Maps a backend error into [`EditError::Storage`] with context.
pub(crate) fn storage_err<E: std::fmt::Display>(context: &'static str) -> impl FnOnce(E) -> EditError {
    move |e| EditError::Storage(format!("{}: {}", context, e))
}
