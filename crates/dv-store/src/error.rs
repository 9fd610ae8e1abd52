//! Error types for record store operations.

use std::time::Duration;

use dv_types::RecordId;

/// Errors that can occur during record store operations.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// A row with this id already exists. Surfaced to the caller, never retried.
    #[error("record {0} already exists")]
    Conflict(RecordId),

    /// No row with this id.
    #[error("record {0} not found")]
    NotFound(RecordId),

    /// The operation did not finish within the caller's deadline.
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),

    /// The backend cannot be reached right now.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored row could not be mapped back to a record.
    #[error("corrupt row for record {id}: {reason}")]
    CorruptRow { id: RecordId, reason: String },

    /// Underlying Postgres/sqlx error.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Whether retrying the same operation later may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Timeout(_) | StoreError::Unavailable(_) => true,
            StoreError::Database(e) => matches!(
                e,
                sqlx::Error::Io(_)
                    | sqlx::Error::PoolTimedOut
                    | sqlx::Error::Protocol(_)
                    | sqlx::Error::WorkerCrashed
            ),
            StoreError::Conflict(_) | StoreError::NotFound(_) | StoreError::CorruptRow { .. } => {
                false
            }
        }
    }
}
