//! # dv-store: Record store for `DataVault`
//!
//! Durable key-value persistence of encrypted blobs, keyed by record id.
//! The store is the only component that holds [`StoredRecord`] rows and the
//! only side effect of ingesting a record.
//!
//! | Type | Backend |
//! |------|---------|
//! | [`MemoryStore`] | In-process map (tests, demo) |
//! | [`PgStore`] | Postgres via `sqlx` |
//! | [`TimeoutStore`] | Deadline wrapper over either |
//!
//! Stores never see plaintext: `data` is always an encrypted blob, and rows
//! are only ever returned to code holding the key.

use std::future::Future;
use std::sync::Arc;

use dv_types::{RecordId, StoredRecord};

mod error;
mod memory;
mod postgres;
mod timeout;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::{PgStore, PgStoreConfig};
pub use timeout::TimeoutStore;

/// Result of an idempotent insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new row was written.
    Inserted,
    /// A row with this id already existed; nothing was written.
    AlreadyPresent,
}

/// Persistence of encrypted record rows.
///
/// Implementations must be safe to call concurrently with distinct ids.
pub trait RecordStore: Send + Sync {
    /// Writes a new row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if a row with `record.id` exists.
    fn insert(&self, record: StoredRecord) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Writes a row unless one with the same id already exists.
    ///
    /// Used with ids derived from log message identity, so a redelivered
    /// message lands on the row an earlier attempt already wrote.
    fn insert_if_absent(
        &self,
        record: StoredRecord,
    ) -> impl Future<Output = Result<InsertOutcome, StoreError>> + Send;

    /// Fetches a row by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such row exists.
    fn lookup(&self, id: RecordId)
    -> impl Future<Output = Result<StoredRecord, StoreError>> + Send;
}

impl<S: RecordStore> RecordStore for Arc<S> {
    fn insert(&self, record: StoredRecord) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).insert(record)
    }

    fn insert_if_absent(
        &self,
        record: StoredRecord,
    ) -> impl Future<Output = Result<InsertOutcome, StoreError>> + Send {
        (**self).insert_if_absent(record)
    }

    fn lookup(
        &self,
        id: RecordId,
    ) -> impl Future<Output = Result<StoredRecord, StoreError>> + Send {
        (**self).lookup(id)
    }
}
