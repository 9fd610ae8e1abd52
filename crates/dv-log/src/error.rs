//! Error types for log operations.

/// Errors that can occur while talking to the durable log.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    /// The stream or consumer group has not been created.
    #[error("no consumer group `{group}` on stream `{stream}`")]
    NoSuchGroup { stream: String, group: String },

    /// The log service cannot be reached. Retry after a backoff.
    #[error("log unavailable: {0}")]
    Unavailable(String),

    /// A message or request was rejected as malformed.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

impl LogError {
    /// Whether retrying later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, LogError::Unavailable(_))
    }
}
