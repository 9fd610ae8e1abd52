//! # dv-log: Durable log with consumer groups
//!
//! The ingestion pipeline reads from an external append-only log through a
//! named consumer group. This crate defines that contract ([`StreamLog`]) and
//! an in-process implementation ([`MemoryLog`]).
//!
//! # Delivery model
//!
//! ```text
//!              publish
//!   producer ─────────► [ 1-0 | 1-1 | 2-0 | 3-0 ]  stream
//!                              │
//!                   read_group │  cursor (last delivered id)
//!                              ▼
//!        ┌─────────── pending entries list ───────────┐
//!        │ id → (consumer, delivered_at, deliveries)  │
//!        └────────────────────────────────────────────┘
//!             │ ack                     │ claim_stale (idle ≥ visibility)
//!             ▼                         ▼
//!          removed            reassigned, deliveries + 1
//! ```
//!
//! - A delivered entry stays pending until acknowledged; nothing is removed
//!   from the stream by reading.
//! - Each pending entry is owned by exactly one consumer at a time.
//! - Acknowledgement is per entry, never a blanket commit.
//! - Creating a group that already exists is a no-op.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use dv_types::{MessageId, StartCursor};

mod error;
mod memory;

pub use error::LogError;
pub use memory::MemoryLog;

/// Field map carried by one log entry.
pub type Fields = BTreeMap<String, Bytes>;

/// An entry handed to a consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: MessageId,
    pub fields: Fields,
    /// How many times this entry has been delivered, including this time.
    pub delivery_count: u32,
}

/// Summary of a delivered but unacknowledged entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEntry {
    pub id: MessageId,
    pub consumer: String,
    pub idle: Duration,
    pub delivery_count: u32,
}

/// Outcome of [`StreamLog::create_group`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupCreation {
    Created,
    AlreadyExists,
}

/// A durable, append-only log with consumer-group reads.
pub trait StreamLog: Send + Sync {
    /// Creates a consumer group, creating the stream too if needed.
    ///
    /// Idempotent: an existing group is left untouched and reported as
    /// [`GroupCreation::AlreadyExists`].
    fn create_group(
        &self,
        stream: &str,
        group: &str,
        start: StartCursor,
    ) -> impl Future<Output = Result<GroupCreation, LogError>> + Send;

    /// Appends an entry and returns its id.
    fn publish(
        &self,
        stream: &str,
        fields: Fields,
    ) -> impl Future<Output = Result<MessageId, LogError>> + Send;

    /// Delivers up to `count` never-delivered entries to `consumer`.
    ///
    /// Waits at most `block` for new entries; returns an empty batch on
    /// timeout. Delivered entries become pending under `consumer`.
    fn read_group(
        &self,
        stream: &str,
        group: &str,
        consumer: &str,
        count: usize,
        block: Duration,
    ) -> impl Future<Output = Result<Vec<LogEntry>, LogError>> + Send;

    /// Acknowledges one entry. Returns `false` if it was not pending.
    fn ack(
        &self,
        stream: &str,
        group: &str,
        id: MessageId,
    ) -> impl Future<Output = Result<bool, LogError>> + Send;

    /// Takes over up to `count` pending entries idle for at least `min_idle`.
    ///
    /// Claimed entries are reassigned to `consumer`, their idle clock resets
    /// and their delivery count increases.
    fn claim_stale(
        &self,
        stream: &str,
        group: &str,
        consumer: &str,
        min_idle: Duration,
        count: usize,
    ) -> impl Future<Output = Result<Vec<LogEntry>, LogError>> + Send;

    /// Lists pending entries in id order.
    fn pending(
        &self,
        stream: &str,
        group: &str,
    ) -> impl Future<Output = Result<Vec<PendingEntry>, LogError>> + Send;
}

impl<L: StreamLog> StreamLog for Arc<L> {
    fn create_group(
        &self,
        stream: &str,
        group: &str,
        start: StartCursor,
    ) -> impl Future<Output = Result<GroupCreation, LogError>> + Send {
        (**self).create_group(stream, group, start)
    }

    fn publish(
        &self,
        stream: &str,
        fields: Fields,
    ) -> impl Future<Output = Result<MessageId, LogError>> + Send {
        (**self).publish(stream, fields)
    }

    fn read_group(
        &self,
        stream: &str,
        group: &str,
        consumer: &str,
        count: usize,
        block: Duration,
    ) -> impl Future<Output = Result<Vec<LogEntry>, LogError>> + Send {
        (**self).read_group(stream, group, consumer, count, block)
    }

    fn ack(
        &self,
        stream: &str,
        group: &str,
        id: MessageId,
    ) -> impl Future<Output = Result<bool, LogError>> + Send {
        (**self).ack(stream, group, id)
    }

    fn claim_stale(
        &self,
        stream: &str,
        group: &str,
        consumer: &str,
        min_idle: Duration,
        count: usize,
    ) -> impl Future<Output = Result<Vec<LogEntry>, LogError>> + Send {
        (**self).claim_stale(stream, group, consumer, min_idle, count)
    }

    fn pending(
        &self,
        stream: &str,
        group: &str,
    ) -> impl Future<Output = Result<Vec<PendingEntry>, LogError>> + Send {
        (**self).pending(stream, group)
    }
}
