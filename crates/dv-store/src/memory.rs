//! In-process record store.
//!
//! Backs tests, the demo CLI and single-process deployments. Rows live in a
//! map guarded by an async `RwLock`; each insert is atomic under the write lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use dv_types::{RecordId, StoredRecord};

use crate::{InsertOutcome, RecordStore, StoreError};

/// A [`RecordStore`] held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<HashMap<RecordId, StoredRecord>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates a backend outage: while set, every operation fails with
    /// [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// Returns a copy of every row, in no particular order.
    pub async fn rows(&self) -> Vec<StoredRecord> {
        self.rows.read().await.values().cloned().collect()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store offline".into()));
        }
        Ok(())
    }
}

impl RecordStore for MemoryStore {
    async fn insert(&self, record: StoredRecord) -> Result<(), StoreError> {
        self.check_available()?;

        let mut rows = self.rows.write().await;
        if rows.contains_key(&record.id) {
            return Err(StoreError::Conflict(record.id));
        }
        rows.insert(record.id, record);
        Ok(())
    }

    async fn insert_if_absent(&self, record: StoredRecord) -> Result<InsertOutcome, StoreError> {
        self.check_available()?;

        let mut rows = self.rows.write().await;
        if rows.contains_key(&record.id) {
            return Ok(InsertOutcome::AlreadyPresent);
        }
        rows.insert(record.id, record);
        Ok(InsertOutcome::Inserted)
    }

    async fn lookup(&self, id: RecordId) -> Result<StoredRecord, StoreError> {
        self.check_available()?;

        self.rows
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }
}
