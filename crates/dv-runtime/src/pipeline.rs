//! The record pipeline: anonymize → encrypt → fingerprint, and back.
//!
//! Pure apart from the random source: no store, no log, no logging of
//! record values. Shared by the consumer and the gateway.

use std::sync::Arc;

use dv_crypto::{EncryptedBlob, EncryptionKey, blob_hash, decrypt_record, encrypt_record};
use dv_transform::Anonymizer;
use dv_types::{
    AnonymizedRecord, DataType, IngestEnvelope, RawRecord, RecordId, RetrieveResponse,
    StoredRecord,
};

use crate::RuntimeError;

/// Turns raw records into encrypted rows and rows back into records.
#[derive(Debug, Clone)]
pub struct Pipeline {
    anonymizer: Anonymizer,
    key: Arc<EncryptionKey>,
}

impl Pipeline {
    pub fn new(anonymizer: Anonymizer, key: Arc<EncryptionKey>) -> Self {
        Self { anonymizer, key }
    }

    pub fn anonymizer(&self) -> &Anonymizer {
        &self.anonymizer
    }

    /// Anonymizes and encrypts a parsed record into a row.
    pub fn seal(
        &self,
        id: RecordId,
        data_type: DataType,
        raw: &RawRecord,
    ) -> Result<StoredRecord, RuntimeError> {
        let anonymized = self.anonymizer.anonymize(raw);
        let blob = encrypt_record(&self.key, &anonymized)?;
        let data_hash = blob_hash(&blob);

        Ok(StoredRecord::new(id, blob.into_bytes(), data_type, data_hash))
    }

    /// Parses an envelope's JSON payload and seals it.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Envelope`] if the payload is not a JSON object.
    pub fn seal_envelope(
        &self,
        id: RecordId,
        envelope: &IngestEnvelope,
    ) -> Result<StoredRecord, RuntimeError> {
        let raw = RawRecord::from_json_bytes(&envelope.data)?;
        self.seal(id, envelope.data_type.clone(), &raw)
    }

    /// Decrypts a stored row.
    ///
    /// # Errors
    ///
    /// - [`dv_crypto::CryptoError::Format`] if the blob is truncated
    /// - [`dv_crypto::CryptoError::Integrity`] on a wrong key or tampered blob
    /// - [`dv_crypto::CryptoError::Decode`] if the plaintext is not a record
    pub fn open(&self, row: &StoredRecord) -> Result<RetrieveResponse, RuntimeError> {
        let blob = EncryptedBlob::from_bytes(row.data.clone())?;
        let data: AnonymizedRecord = decrypt_record(&self.key, &blob)?;

        Ok(RetrieveResponse {
            data_type: row.data_type.clone(),
            data,
        })
    }
}
