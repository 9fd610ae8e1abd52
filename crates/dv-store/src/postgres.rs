//! Postgres-backed record store.
//!
//! ```text
//! records(id UUID PRIMARY KEY, data BYTEA, data_type TEXT, data_hash TEXT, created_at TIMESTAMP)
//! ```
//!
//! Connections are checked out of a [`PgPool`] per operation and returned on
//! completion or error. Each insert is a single statement, so it is atomic.

use std::time::Duration;

use bytes::Bytes;
use chrono::NaiveDateTime;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use dv_types::{DataType, RecordId, StoredRecord};

use crate::{InsertOutcome, RecordStore, StoreError};

/// Schema applied by [`PgStore::ensure_schema`] for development databases.
const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS records (
    id UUID PRIMARY KEY,
    data BYTEA NOT NULL,
    data_type TEXT NOT NULL,
    data_hash TEXT NOT NULL,
    created_at TIMESTAMP NOT NULL
)";

const INSERT_SQL: &str = "INSERT INTO records (id, data, data_type, data_hash, created_at)
     VALUES ($1, $2, $3, $4, $5)";

const INSERT_IF_ABSENT_SQL: &str = "INSERT INTO records (id, data, data_type, data_hash, created_at)
     VALUES ($1, $2, $3, $4, $5)
     ON CONFLICT (id) DO NOTHING";

const LOOKUP_SQL: &str =
    "SELECT id, data, data_type, data_hash, created_at FROM records WHERE id = $1";

// ============================================================================
// Configuration
// ============================================================================

/// Connection settings for [`PgStore`].
#[derive(Debug, Clone)]
pub struct PgStoreConfig {
    /// Postgres connection URL.
    pub url: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// How long to wait for a pooled connection before giving up.
    pub acquire_timeout: Duration,
}

impl PgStoreConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }
}

impl Default for PgStoreConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/datavault".to_string(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

// ============================================================================
// PgStore
// ============================================================================

/// A [`RecordStore`] persisting rows in Postgres.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Opens a connection pool.
    pub async fn connect(config: &PgStoreConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.url)
            .await?;

        tracing::info!(
            max_connections = config.max_connections,
            "connected to record store"
        );
        Ok(Self { pool })
    }

    /// Wraps an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the `records` table if it does not exist.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE_SQL).execute(&self.pool).await?;
        Ok(())
    }

    /// Cheap connectivity probe.
    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn execute_insert(&self, sql: &str, record: &StoredRecord) -> Result<u64, StoreError> {
        let result = sqlx::query(sql)
            .bind(*record.id.as_uuid())
            .bind(&record.data[..])
            .bind(record.data_type.as_str())
            .bind(record.data_hash.as_str())
            .bind(record.created_at.naive_utc())
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => Ok(done.rows_affected()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::Conflict(record.id))
            }
            Err(e) => Err(StoreError::Database(e)),
        }
    }
}

fn row_to_record(id: RecordId, row: &PgRow) -> Result<StoredRecord, StoreError> {
    let corrupt = |e: sqlx::Error| StoreError::CorruptRow {
        id,
        reason: e.to_string(),
    };

    let stored_id: Uuid = row.try_get("id").map_err(corrupt)?;
    let data: Vec<u8> = row.try_get("data").map_err(corrupt)?;
    let data_type: String = row.try_get("data_type").map_err(corrupt)?;
    let data_hash: String = row.try_get("data_hash").map_err(corrupt)?;
    let created_at: NaiveDateTime = row.try_get("created_at").map_err(corrupt)?;

    debug_assert_eq!(RecordId::from_uuid(stored_id), id);

    Ok(StoredRecord {
        id: RecordId::from_uuid(stored_id),
        data: Bytes::from(data),
        data_type: DataType::from(data_type),
        data_hash,
        created_at: created_at.and_utc(),
    })
}

impl RecordStore for PgStore {
    async fn insert(&self, record: StoredRecord) -> Result<(), StoreError> {
        self.execute_insert(INSERT_SQL, &record).await?;
        tracing::debug!(record_id = %record.id, data_type = %record.data_type, "row inserted");
        Ok(())
    }

    async fn insert_if_absent(&self, record: StoredRecord) -> Result<InsertOutcome, StoreError> {
        let affected = self.execute_insert(INSERT_IF_ABSENT_SQL, &record).await?;
        let outcome = if affected == 0 {
            InsertOutcome::AlreadyPresent
        } else {
            InsertOutcome::Inserted
        };
        tracing::debug!(record_id = %record.id, ?outcome, "row upserted");
        Ok(outcome)
    }

    async fn lookup(&self, id: RecordId) -> Result<StoredRecord, StoreError> {
        let row = sqlx::query(LOOKUP_SQL)
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => row_to_record(id, &row),
            None => Err(StoreError::NotFound(id)),
        }
    }
}
