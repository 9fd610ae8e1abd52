//! Commands: what the runtime observed.

use crate::state::FailureKind;

/// An observation fed into the kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start handling a freshly received message.
    Begin,
    /// The store accepted the row (or already had it).
    Persisted,
    /// The log confirmed the acknowledgement.
    Acked,
    /// Processing, storing or acknowledging failed.
    Fail {
        kind: FailureKind,
        /// Error description. Must not contain record values.
        reason: String,
    },
}

impl Command {
    pub fn retryable(reason: impl Into<String>) -> Self {
        Command::Fail {
            kind: FailureKind::Retryable,
            reason: reason.into(),
        }
    }

    pub fn poison(reason: impl Into<String>) -> Self {
        Command::Fail {
            kind: FailureKind::Poison,
            reason: reason.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Begin => "begin",
            Command::Persisted => "persisted",
            Command::Acked => "acked",
            Command::Fail { .. } => "fail",
        }
    }
}
