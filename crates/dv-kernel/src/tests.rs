//! Unit tests for dv-kernel
//!
//! The kernel is pure (no IO), so every transition is tested directly.

use dv_types::MessageId;

use crate::command::Command;
use crate::effects::Effect;
use crate::kernel::{KernelError, apply};
use crate::state::{DeliveryPolicy, FailureKind, MessageState, TrackedMessage};

// ============================================================================
// Test Helpers
// ============================================================================

fn policy() -> DeliveryPolicy {
    DeliveryPolicy::new(3)
}

fn received(delivery_count: u32) -> TrackedMessage {
    TrackedMessage::received(MessageId::new(1_700_000_000_000, 0), delivery_count)
}

fn processing(delivery_count: u32) -> TrackedMessage {
    let (msg, _) = apply(received(delivery_count), Command::Begin, &policy()).unwrap();
    assert_eq!(msg.state, MessageState::Processing);
    msg
}

fn stored(delivery_count: u32) -> TrackedMessage {
    let (msg, _) = apply(processing(delivery_count), Command::Persisted, &policy()).unwrap();
    msg
}

// ============================================================================
// Happy Path
// ============================================================================

#[test]
fn begin_requests_processing() {
    let (msg, effects) = apply(received(1), Command::Begin, &policy()).unwrap();

    assert_eq!(msg.state, MessageState::Processing);
    assert_eq!(effects, vec![Effect::Process]);
}

#[test]
fn persisted_requests_ack() {
    let (msg, effects) = apply(processing(1), Command::Persisted, &policy()).unwrap();

    assert_eq!(msg.state, MessageState::Stored);
    assert_eq!(effects, vec![Effect::Acknowledge]);
}

#[test]
fn acked_is_terminal() {
    let (msg, effects) = apply(stored(1), Command::Acked, &policy()).unwrap();

    assert_eq!(msg.state, MessageState::Acknowledged);
    assert!(msg.state.is_terminal());
    assert!(effects.is_empty());
}

#[test]
fn message_identity_is_preserved() {
    let msg = stored(2);
    assert_eq!(msg.id, MessageId::new(1_700_000_000_000, 0));
    assert_eq!(msg.delivery_count, 2);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn retryable_failure_releases() {
    let (msg, effects) = apply(processing(1), Command::retryable("store timeout"), &policy()).unwrap();

    assert_eq!(msg.state, MessageState::Failed(FailureKind::Retryable));
    assert_eq!(effects, vec![Effect::Release]);
}

#[test]
fn poison_failure_dead_letters_then_acks() {
    let (msg, effects) = apply(processing(1), Command::poison("bad envelope"), &policy()).unwrap();

    assert_eq!(msg.state, MessageState::Failed(FailureKind::Poison));
    assert_eq!(
        effects,
        vec![
            Effect::DeadLetter {
                reason: "bad envelope".into()
            },
            Effect::Acknowledge,
        ]
    );
}

#[test]
fn poison_before_processing_is_quarantined() {
    let (msg, effects) = apply(received(1), Command::poison("missing field"), &policy()).unwrap();

    assert_eq!(msg.state, MessageState::Failed(FailureKind::Poison));
    assert_eq!(effects.last(), Some(&Effect::Acknowledge));
}

#[test]
fn retryable_on_last_delivery_escalates_to_poison() {
    let (msg, effects) = apply(processing(3), Command::retryable("store down"), &policy()).unwrap();

    assert_eq!(msg.state, MessageState::Failed(FailureKind::Poison));
    assert!(matches!(effects[0], Effect::DeadLetter { ref reason } if reason == "store down"));
    assert_eq!(effects[1], Effect::Acknowledge);
}

#[test]
fn failure_after_store_never_quarantines() {
    for kind in [FailureKind::Retryable, FailureKind::Poison] {
        let cmd = Command::Fail {
            kind,
            reason: "ack lost".into(),
        };
        let (msg, effects) = apply(stored(3), cmd, &policy()).unwrap();

        assert_eq!(msg.state, MessageState::Failed(FailureKind::Retryable));
        assert_eq!(effects, vec![Effect::Release]);
    }
}

#[test]
fn exhausted_message_is_quarantined_without_processing() {
    let (msg, effects) = apply(received(4), Command::Begin, &policy()).unwrap();

    assert_eq!(msg.state, MessageState::Failed(FailureKind::Poison));
    assert!(!effects.contains(&Effect::Process));
    assert!(matches!(effects[0], Effect::DeadLetter { .. }));
    assert_eq!(effects[1], Effect::Acknowledge);
}

#[test]
fn last_delivery_is_still_processed() {
    let (msg, effects) = apply(received(3), Command::Begin, &policy()).unwrap();

    assert_eq!(msg.state, MessageState::Processing);
    assert_eq!(effects, vec![Effect::Process]);
}

#[test]
fn acking_quarantined_message_is_a_no_op() {
    let (msg, _) = apply(processing(1), Command::poison("bad"), &policy()).unwrap();
    let (after, effects) = apply(msg.clone(), Command::Acked, &policy()).unwrap();

    assert_eq!(after, msg);
    assert!(effects.is_empty());
}

// ============================================================================
// Invalid Transitions
// ============================================================================

#[test]
fn persisted_before_begin_is_rejected() {
    let result = apply(received(1), Command::Persisted, &policy());
    assert_eq!(
        result.unwrap_err(),
        KernelError::InvalidTransition {
            state: MessageState::Received,
            command: "persisted",
        }
    );
}

#[test]
fn ack_before_store_is_rejected() {
    assert!(apply(processing(1), Command::Acked, &policy()).is_err());
    assert!(apply(received(1), Command::Acked, &policy()).is_err());
}

#[test]
fn double_begin_is_rejected() {
    assert!(apply(processing(1), Command::Begin, &policy()).is_err());
}

#[test]
fn nothing_moves_an_acknowledged_message() {
    let (done, _) = apply(stored(1), Command::Acked, &policy()).unwrap();
    for cmd in [
        Command::Begin,
        Command::Persisted,
        Command::Acked,
        Command::retryable("x"),
    ] {
        assert!(apply(done.clone(), cmd, &policy()).is_err());
    }
}

#[test]
fn released_message_accepts_nothing() {
    let (released, _) = apply(processing(1), Command::retryable("x"), &policy()).unwrap();
    assert!(apply(released.clone(), Command::Acked, &policy()).is_err());
    assert!(apply(released, Command::Begin, &policy()).is_err());
}

// ============================================================================
// Policy
// ============================================================================

#[test]
fn policy_never_allows_zero_deliveries() {
    assert_eq!(DeliveryPolicy::new(0).max_deliveries, 1);
    assert_eq!(DeliveryPolicy::default().max_deliveries, 5);
}

#[test]
fn state_display() {
    assert_eq!(MessageState::Failed(FailureKind::Poison).to_string(), "failed(poison)");
    assert_eq!(MessageState::Stored.to_string(), "stored");
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn command_strategy() -> impl Strategy<Value = Command> {
        prop_oneof![
            Just(Command::Begin),
            Just(Command::Persisted),
            Just(Command::Acked),
            Just(Command::retryable("transient")),
            Just(Command::poison("malformed")),
        ]
    }

    proptest! {
        #[test]
        fn state_never_moves_backwards(
            delivery_count in 1u32..8,
            max in 1u32..6,
            cmds in prop::collection::vec(command_strategy(), 0..12),
        ) {
            let policy = DeliveryPolicy::new(max);
            let mut msg = received(delivery_count);

            for cmd in cmds {
                let before = msg.state.rank();
                if let Ok((next, _)) = apply(msg.clone(), cmd, &policy) {
                    prop_assert!(next.state.rank() >= before);
                    msg = next;
                }
            }
        }

        #[test]
        fn ack_effect_only_after_store_or_quarantine(
            delivery_count in 1u32..8,
            cmds in prop::collection::vec(command_strategy(), 0..12),
        ) {
            let policy = DeliveryPolicy::new(3);
            let mut msg = received(delivery_count);

            for cmd in cmds {
                if let Ok((next, effects)) = apply(msg.clone(), cmd, &policy) {
                    if effects.contains(&Effect::Acknowledge) {
                        prop_assert!(matches!(
                            next.state,
                            MessageState::Stored | MessageState::Failed(FailureKind::Poison)
                        ));
                    }
                    msg = next;
                }
            }
        }

        #[test]
        fn process_requested_at_most_once(
            delivery_count in 1u32..8,
            cmds in prop::collection::vec(command_strategy(), 0..12),
        ) {
            let policy = DeliveryPolicy::default();
            let mut msg = received(delivery_count);
            let mut processed = 0;

            for cmd in cmds {
                if let Ok((next, effects)) = apply(msg.clone(), cmd, &policy) {
                    processed += effects.iter().filter(|e| **e == Effect::Process).count();
                    msg = next;
                }
            }
            prop_assert!(processed <= 1);
        }

        #[test]
        fn retryable_failures_quarantine_only_on_last_delivery(
            delivery_count in 1u32..10,
            max in 1u32..10,
        ) {
            let policy = DeliveryPolicy::new(max);
            prop_assume!(!policy.is_exhausted(delivery_count));

            let (msg, _) = apply(received(delivery_count), Command::Begin, &policy).unwrap();
            let (msg, _) = apply(msg, Command::retryable("x"), &policy).unwrap();

            let expected = if delivery_count >= max {
                FailureKind::Poison
            } else {
                FailureKind::Retryable
            };
            prop_assert_eq!(msg.state, MessageState::Failed(expected));
        }
    }
}
