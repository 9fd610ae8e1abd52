//! Per-message state.

use std::fmt::{Display, Formatter};

use dv_types::MessageId;

/// Why processing a message stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// A transient fault (store or log outage, timeout). Redelivery may succeed.
    Retryable,
    /// The message itself is bad (malformed envelope, undecodable payload),
    /// or it has exhausted its deliveries. Retrying cannot help.
    Poison,
}

/// Where a message is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageState {
    /// Pulled from the log under the group cursor; still pending there.
    Received,
    /// Envelope decoded; transform and encryption under way.
    Processing,
    /// The row is durable in the store.
    Stored,
    /// The log has been told; the message will not be redelivered.
    Acknowledged,
    Failed(FailureKind),
}

impl MessageState {
    /// Whether the message is done with for this delivery.
    pub fn is_terminal(&self) -> bool {
        matches!(self, MessageState::Acknowledged | MessageState::Failed(_))
    }

    /// Progress order used to check that states never move backwards.
    pub fn rank(&self) -> u8 {
        match self {
            MessageState::Received => 0,
            MessageState::Processing => 1,
            MessageState::Stored => 2,
            MessageState::Acknowledged | MessageState::Failed(_) => 3,
        }
    }
}

impl Display for MessageState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageState::Received => write!(f, "received"),
            MessageState::Processing => write!(f, "processing"),
            MessageState::Stored => write!(f, "stored"),
            MessageState::Acknowledged => write!(f, "acknowledged"),
            MessageState::Failed(FailureKind::Retryable) => write!(f, "failed(retryable)"),
            MessageState::Failed(FailureKind::Poison) => write!(f, "failed(poison)"),
        }
    }
}

/// A message the consumer currently owns.
///
/// Lives only for the duration of one delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedMessage {
    pub id: MessageId,
    /// Deliveries so far, including this one. Starts at 1.
    pub delivery_count: u32,
    pub state: MessageState,
}

impl TrackedMessage {
    pub fn received(id: MessageId, delivery_count: u32) -> Self {
        debug_assert!(delivery_count >= 1, "delivery count starts at 1");
        Self {
            id,
            delivery_count,
            state: MessageState::Received,
        }
    }

    pub(crate) fn with_state(self, state: MessageState) -> Self {
        debug_assert!(
            state.rank() >= self.state.rank(),
            "state moved backwards: {} -> {}",
            self.state,
            state
        );
        Self { state, ..self }
    }
}

/// How many times a message may be delivered before it is quarantined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryPolicy {
    pub max_deliveries: u32,
}

impl DeliveryPolicy {
    pub const DEFAULT_MAX_DELIVERIES: u32 = 5;

    /// `max_deliveries` below 1 is raised to 1.
    pub fn new(max_deliveries: u32) -> Self {
        Self {
            max_deliveries: max_deliveries.max(1),
        }
    }

    /// Whether this delivery is the last one allowed.
    pub fn is_last_delivery(&self, delivery_count: u32) -> bool {
        delivery_count >= self.max_deliveries
    }

    /// Whether the message has already used up its deliveries.
    pub fn is_exhausted(&self, delivery_count: u32) -> bool {
        delivery_count > self.max_deliveries
    }
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_DELIVERIES)
    }
}
