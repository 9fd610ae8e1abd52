//! # dv-runtime: Imperative shell for `DataVault`
//!
//! Coordinates the pure pieces (transform, codec, message kernel) with the
//! two external collaborators: the durable log and the record store.
//!
//! # Architecture
//!
//! ```text
//!   Gateway::publish                         Gateway::ingest
//!         │                                        │
//!         ▼                                        │
//!  ┌────────────┐   ┌──────────────────────────────┼────────────────┐
//!  │ StreamLog  │ → │ Consumer                     ▼                │
//!  │ (group)    │   │  ┌────────┐   ┌───────────────────────────┐   │
//!  └────────────┘   │  │ Kernel │ → │ Pipeline                  │   │
//!        ▲          │  │ (pure) │   │ anonymize → seal → hash   │   │
//!        │ ack      │  └────────┘   └─────────────┬─────────────┘   │
//!        └──────────┤                             ▼                 │
//!                   │                      RecordStore::insert      │
//!                   └───────────────────────────────────────────────┘
//! ```
//!
//! A message is acknowledged only after its row is durable. Anything that
//! goes wrong before that leaves it pending on the log, so delivery is
//! at-least-once. With [`IdPolicy::DerivedFromMessage`] the row id is a
//! function of the message id, and a redelivery lands on the row already
//! written instead of adding a second one.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use dv_crypto::EncryptionKey;
//! use dv_log::MemoryLog;
//! use dv_runtime::{Consumer, ConsumerConfig, ConsumerContext};
//! use dv_store::MemoryStore;
//!
//! let key = Arc::new(EncryptionKey::from_env("DATAVAULT_ENCRYPTION_KEY")?);
//! let ctx = ConsumerContext::new(
//!     Arc::new(MemoryLog::new()),
//!     Arc::new(MemoryStore::new()),
//!     key,
//!     ConsumerConfig::new("ingestion_stream", "processor_group"),
//! )?;
//!
//! let (stop, shutdown) = tokio::sync::watch::channel(false);
//! let stats = Consumer::new(ctx).run(shutdown).await?;
//! ```

mod config;
mod consumer;
mod context;
mod error;
mod gateway;
mod pipeline;

pub use config::{ConsumerConfig, GatewayConfig, IdPolicy};
pub use consumer::{Consumer, ConsumerStats, MessageOutcome, dead_letter_fields};
pub use context::ConsumerContext;
pub use error::RuntimeError;
pub use gateway::Gateway;
pub use pipeline::Pipeline;
