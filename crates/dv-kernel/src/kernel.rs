//! The kernel: pure transition function for one message.
//!
//! # Example
//!
//! ```
//! use dv_kernel::{Command, DeliveryPolicy, Effect, MessageState, TrackedMessage, apply};
//! use dv_types::MessageId;
//!
//! let policy = DeliveryPolicy::default();
//! let msg = TrackedMessage::received(MessageId::new(1, 0), 1);
//!
//! let (msg, effects) = apply(msg, Command::Begin, &policy).unwrap();
//! assert_eq!(effects, vec![Effect::Process]);
//!
//! let (msg, effects) = apply(msg, Command::Persisted, &policy).unwrap();
//! assert_eq!(effects, vec![Effect::Acknowledge]);
//!
//! let (msg, _) = apply(msg, Command::Acked, &policy).unwrap();
//! assert_eq!(msg.state, MessageState::Acknowledged);
//! ```

use crate::command::Command;
use crate::effects::Effect;
use crate::state::{DeliveryPolicy, FailureKind, MessageState, TrackedMessage};

/// Applies a command to a message, producing its new state and the effects
/// the runtime must execute.
///
/// Takes ownership of the message and returns the updated one.
pub fn apply(
    msg: TrackedMessage,
    cmd: Command,
    policy: &DeliveryPolicy,
) -> Result<(TrackedMessage, Vec<Effect>), KernelError> {
    match (msg.state, cmd) {
        (MessageState::Received, Command::Begin) => {
            // Crashed consumers never report a failure, so a message that
            // keeps killing its consumer is caught here.
            if policy.is_exhausted(msg.delivery_count) {
                let reason = format!(
                    "delivered {} times, limit is {}",
                    msg.delivery_count, policy.max_deliveries
                );
                return Ok(quarantine(msg, reason));
            }
            Ok((
                msg.with_state(MessageState::Processing),
                vec![Effect::Process],
            ))
        }

        (MessageState::Processing, Command::Persisted) => Ok((
            msg.with_state(MessageState::Stored),
            vec![Effect::Acknowledge],
        )),

        (MessageState::Stored, Command::Acked) => {
            Ok((msg.with_state(MessageState::Acknowledged), Vec::new()))
        }

        // Acknowledging a quarantined message changes nothing.
        (MessageState::Failed(FailureKind::Poison), Command::Acked) => Ok((msg, Vec::new())),

        // The row is already durable and only the ack is missing, so the
        // message is never quarantined from here.
        (MessageState::Stored, Command::Fail { .. }) => Ok((
            msg.with_state(MessageState::Failed(FailureKind::Retryable)),
            vec![Effect::Release],
        )),

        (MessageState::Received | MessageState::Processing, Command::Fail { kind, reason }) => {
            let poison = kind == FailureKind::Poison || policy.is_last_delivery(msg.delivery_count);
            if poison {
                Ok(quarantine(msg, reason))
            } else {
                Ok((
                    msg.with_state(MessageState::Failed(FailureKind::Retryable)),
                    vec![Effect::Release],
                ))
            }
        }

        (state, cmd) => Err(KernelError::InvalidTransition {
            state,
            command: cmd.name(),
        }),
    }
}

fn quarantine(msg: TrackedMessage, reason: String) -> (TrackedMessage, Vec<Effect>) {
    (
        msg.with_state(MessageState::Failed(FailureKind::Poison)),
        vec![Effect::DeadLetter { reason }, Effect::Acknowledge],
    )
}

/// Errors that can occur when applying commands to the kernel.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    #[error("command `{command}` is not valid in state {state}")]
    InvalidTransition {
        state: MessageState,
        command: &'static str,
    },
}
