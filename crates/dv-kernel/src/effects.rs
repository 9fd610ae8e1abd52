//! Effects: what the runtime must do next.

/// A side effect requested by the kernel.
///
/// Effects are returned in the order they must be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Decode the envelope, anonymize, encrypt and store.
    Process,
    /// Acknowledge the message on the log.
    Acknowledge,
    /// Copy the message to the dead-letter stream with this reason.
    DeadLetter { reason: String },
    /// Leave the message pending for redelivery and back off.
    Release,
}
