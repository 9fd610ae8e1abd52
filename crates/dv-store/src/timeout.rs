//! Deadline wrapper for any [`RecordStore`].
//!
//! A timed-out operation is dropped mid-flight. Inserts are single atomic
//! statements, so a cancelled insert either happened completely or not at all.

use std::time::Duration;

use dv_types::{RecordId, StoredRecord};

use crate::{InsertOutcome, RecordStore, StoreError};

/// Bounds every call on the inner store by a fixed deadline.
#[derive(Debug, Clone)]
pub struct TimeoutStore<S> {
    inner: S,
    timeout: Duration,
}

impl<S: RecordStore> TimeoutStore<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        debug_assert!(!timeout.is_zero(), "zero store timeout");
        Self { inner, timeout }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

async fn within<T>(
    timeout: Duration,
    op: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, StoreError> {
    tokio::time::timeout(timeout, op)
        .await
        .map_err(|_| StoreError::Timeout(timeout))?
}

impl<S: RecordStore> RecordStore for TimeoutStore<S> {
    async fn insert(&self, record: StoredRecord) -> Result<(), StoreError> {
        within(self.timeout, self.inner.insert(record)).await
    }

    async fn insert_if_absent(&self, record: StoredRecord) -> Result<InsertOutcome, StoreError> {
        within(self.timeout, self.inner.insert_if_absent(record)).await
    }

    async fn lookup(&self, id: RecordId) -> Result<StoredRecord, StoreError> {
        within(self.timeout, self.inner.lookup(id)).await
    }
}
