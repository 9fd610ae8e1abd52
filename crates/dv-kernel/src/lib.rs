//! # dv-kernel: Functional core of the `DataVault` consumer
//!
//! Decides, for one log message, what the consumer does next. The kernel is
//! pure: it never touches the log, the store or a clock. The runtime feeds
//! it commands describing what just happened and executes the effects it
//! returns.
//!
//! ## States
//!
//! ```text
//! Received ──Begin──► Processing ──Persisted──► Stored ──Acked──► Acknowledged
//!     │                   │                       │
//!     └───────────────────┴─────── Fail ──────────┴──► Failed(Retryable | Poison)
//! ```
//!
//! - `Failed(Retryable)` leaves the message unacknowledged; the log redelivers it.
//! - `Failed(Poison)` routes it to the dead-letter stream and acknowledges it.
//! - A retryable failure on the last permitted delivery is escalated to poison.
//!
//! ## Modules
//!
//! - [`command`]: What just happened (`Begin`, `Persisted`, `Acked`, `Fail`)
//! - [`effects`]: What to do next (`Process`, `Acknowledge`, `DeadLetter`, `Release`)
//! - [`state`]: Per-message state and delivery policy
//! - [`kernel`]: The `apply` function that ties it all together

pub mod command;
pub mod effects;
pub mod kernel;
pub mod state;

#[cfg(test)]
mod tests;

pub use command::Command;
pub use effects::Effect;
pub use kernel::{KernelError, apply};
pub use state::{DeliveryPolicy, FailureKind, MessageState, TrackedMessage};
