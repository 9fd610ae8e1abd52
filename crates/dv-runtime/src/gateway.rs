//! Ingestion gateway: the entry points the RPC and HTTP front ends call.
//!
//! Two ways in:
//!
//! - [`Gateway::ingest`] transforms, encrypts and stores inline and reports
//!   the outcome as a status, never as an error.
//! - [`Gateway::publish`] appends the submission to the log for a
//!   [`crate::Consumer`] to pick up.
//!
//! One way out: [`Gateway::retrieve`] looks a row up and decrypts it.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, warn};

use dv_crypto::EncryptionKey;
use dv_log::StreamLog;
use dv_store::{RecordStore, StoreError, TimeoutStore};
use dv_transform::Anonymizer;
use dv_types::{
    DataType, IngestEnvelope, IngestResponse, MessageId, RawRecord, RecordId, RetrieveResponse,
};

use crate::RuntimeError;
use crate::config::GatewayConfig;
use crate::pipeline::Pipeline;

/// Front door of the pipeline. Safe to share between concurrent callers.
#[derive(Debug)]
pub struct Gateway<L, S> {
    log: L,
    store: TimeoutStore<S>,
    pipeline: Pipeline,
    config: GatewayConfig,
}

impl<L, S> Gateway<L, S>
where
    L: StreamLog,
    S: RecordStore,
{
    /// # Errors
    ///
    /// Returns [`RuntimeError::Config`] if `config` fails validation.
    pub fn new(
        log: L,
        store: S,
        key: Arc<EncryptionKey>,
        config: GatewayConfig,
    ) -> Result<Self, RuntimeError> {
        Self::with_anonymizer(log, store, key, config, Anonymizer::default())
    }

    pub fn with_anonymizer(
        log: L,
        store: S,
        key: Arc<EncryptionKey>,
        config: GatewayConfig,
        anonymizer: Anonymizer,
    ) -> Result<Self, RuntimeError> {
        config.validate()?;
        Ok(Self {
            log,
            store: TimeoutStore::new(store, config.store_timeout),
            pipeline: Pipeline::new(anonymizer, key),
            config,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        self.store.inner()
    }

    // ========================================================================
    // Synchronous Ingest
    // ========================================================================

    /// Ingests a raw JSON record inline under a fresh random id.
    ///
    /// Failures are logged and reported as `ERROR`; nothing is thrown across
    /// the boundary.
    pub async fn ingest(&self, data_type: DataType, data: &[u8]) -> IngestResponse {
        let envelope = IngestEnvelope::new(data_type, Bytes::copy_from_slice(data));
        self.ingest_envelope(&envelope).await
    }

    /// Like [`Gateway::ingest`], honouring an id carried by the envelope.
    pub async fn ingest_envelope(&self, envelope: &IngestEnvelope) -> IngestResponse {
        match self.try_ingest(envelope).await {
            Ok(id) => IngestResponse::ok(id),
            Err(e) => {
                warn!(id = ?envelope.id, data_type = %envelope.data_type, error = %e, "ingest failed");
                IngestResponse::error()
            }
        }
    }

    /// Ingests an envelope and returns the row id.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::Envelope`] if the payload is not a JSON object
    /// - [`RuntimeError::Store`] with [`StoreError::Conflict`] if the
    ///   envelope's id is already taken. Not retried.
    /// - [`RuntimeError::Store`] on outages and timeouts
    pub async fn try_ingest(&self, envelope: &IngestEnvelope) -> Result<RecordId, RuntimeError> {
        let id = envelope.id.unwrap_or_else(RecordId::new_random);
        let row = self.pipeline.seal_envelope(id, envelope)?;
        self.store.insert(row).await?;

        info!(record_id = %id, data_type = %envelope.data_type, "record ingested");
        Ok(id)
    }

    // ========================================================================
    // Asynchronous Submission
    // ========================================================================

    /// Appends a submission to the ingestion stream.
    ///
    /// The payload is checked to be a JSON object first, so malformed input
    /// is rejected here instead of being quarantined by a consumer later.
    pub async fn publish(
        &self,
        data_type: DataType,
        data: impl Into<Bytes>,
    ) -> Result<MessageId, RuntimeError> {
        let data = data.into();
        RawRecord::from_json_bytes(&data)?;

        let envelope = IngestEnvelope::new(data_type, data);
        let id = self
            .log
            .publish(&self.config.stream, envelope.to_fields())
            .await?;

        debug!(message_id = %id, stream = %self.config.stream, "submission published");
        Ok(id)
    }

    // ========================================================================
    // Retrieval
    // ========================================================================

    /// Looks up and decrypts a record. `None` if no row has this id.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::Crypto`] if the row cannot be decrypted with the key
    /// - [`RuntimeError::Store`] on outages and timeouts
    pub async fn retrieve(&self, id: RecordId) -> Result<Option<RetrieveResponse>, RuntimeError> {
        match self.store.lookup(id).await {
            Ok(row) => Ok(Some(self.pipeline.open(&row)?)),
            Err(StoreError::NotFound(_)) => {
                debug!(record_id = %id, "record not found");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Retrieves a record and renders its one-line summary.
    pub async fn summarize(&self, id: RecordId) -> Result<Option<String>, RuntimeError> {
        Ok(self
            .retrieve(id)
            .await?
            .map(|found| found.data_type.summarize(found.data.fields())))
    }
}
