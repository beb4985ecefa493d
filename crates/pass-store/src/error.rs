//! Storage error types for pass-store.

use pass_core::errors::CoreError;
use thiserror::Error;

/// Errors from persistence and service operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a store file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The requested entity does not exist.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// A save would rewrite or drop history sessions that are already stored.
    #[error("History for '{user_id}' is append-only: {reason}")]
    AppendOnlyViolation { user_id: String, reason: String },

    /// An identifier cannot be used as a storage key.
    #[error("Invalid identifier '{0}'")]
    InvalidId(String),

    /// The operation does not apply to the record's current state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Validation or computation error from the engine.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    pub(crate) fn user_not_found(id: &str) -> Self {
        Self::NotFound {
            entity: "user",
            id: id.to_string(),
        }
    }

    pub(crate) fn session_not_found(id: &str) -> Self {
        Self::NotFound {
            entity: "session",
            id: id.to_string(),
        }
    }
}
