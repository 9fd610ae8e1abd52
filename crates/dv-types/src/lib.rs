//! # dv-types: Core types for `DataVault`
//!
//! This crate contains the shared data model used across the ingestion
//! pipeline:
//! - Identifiers ([`RecordId`], [`MessageId`])
//! - Record classification ([`DataType`])
//! - Record shapes ([`RawRecord`], [`AnonymizedRecord`], [`StoredRecord`])
//! - The ingestion envelope carried on the log and over RPC ([`IngestEnvelope`])
//! - Gateway responses ([`IngestStatus`], [`IngestResponse`], [`RetrieveResponse`])
//!
//! Record values are never exposed through `Debug`; only field names are shown.

use std::collections::BTreeMap;
use std::fmt::{Debug, Display};
use std::str::FromStr;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while parsing or validating shared types.
#[derive(thiserror::Error, Debug)]
pub enum TypeError {
    #[error("invalid record id: {0}")]
    InvalidRecordId(String),

    #[error("invalid message id: {0}")]
    InvalidMessageId(String),

    #[error("record payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("record payload must be a JSON object")]
    NotAnObject,

    #[error("envelope is missing field `{0}`")]
    MissingField(&'static str),

    #[error("envelope field `{0}` is not valid UTF-8")]
    InvalidUtf8(&'static str),

    #[error("invalid start cursor: {0}")]
    InvalidCursor(String),
}

// ============================================================================
// Record ID - Copy (16-byte UUID)
// ============================================================================

/// Namespace for record ids derived from log message ids.
///
/// Fixed forever: changing it would break deduplication of redelivered
/// messages that were stored under the old namespace.
const DERIVED_ID_NAMESPACE: Uuid = Uuid::from_bytes([
    0x6d, 0x1f, 0x2c, 0x84, 0x3b, 0x57, 0x4e, 0x0a, 0x9c, 0x11, 0x52, 0xd7, 0xa4, 0x0e, 0x83, 0x5b,
]);

/// Identifier of a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Generates a fresh random (v4) record id.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Derives a record id from a log message identity.
    ///
    /// The same `(stream, message_id)` pair always yields the same id, so a
    /// redelivered message maps onto the row written by an earlier attempt.
    pub fn derived(stream: &str, message_id: &MessageId) -> Self {
        let name = format!("{stream}\u{0}{message_id}");
        Self(Uuid::new_v5(&DERIVED_ID_NAMESPACE, name.as_bytes()))
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| TypeError::InvalidRecordId(s.to_string()))
    }
}

impl From<Uuid> for RecordId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<RecordId> for Uuid {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

// ============================================================================
// Message ID - Copy (log entry identifier)
// ============================================================================

/// Identifier of an entry in the durable log.
///
/// Rendered as `<millis>-<sequence>`. Ordering follows append order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MessageId {
    millis: u64,
    seq: u64,
}

impl MessageId {
    pub const ZERO: MessageId = MessageId { millis: 0, seq: 0 };

    pub fn new(millis: u64, seq: u64) -> Self {
        Self { millis, seq }
    }

    pub fn millis(&self) -> u64 {
        self.millis
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Returns the next id within the same millisecond.
    pub fn successor(&self) -> Self {
        Self {
            millis: self.millis,
            seq: self.seq + 1,
        }
    }
}

impl Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.millis, self.seq)
    }
}

impl FromStr for MessageId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TypeError::InvalidMessageId(s.to_string());
        let (millis, seq) = s.split_once('-').ok_or_else(invalid)?;
        Ok(Self {
            millis: millis.parse().map_err(|_| invalid())?,
            seq: seq.parse().map_err(|_| invalid())?,
        })
    }
}

// ============================================================================
// Start Cursor
// ============================================================================

/// Where a newly created consumer group starts reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartCursor {
    /// Deliver every entry already in the stream (`0`).
    #[default]
    Beginning,
    /// Deliver only entries appended after the group was created (`$` / `>`).
    Latest,
}

impl Display for StartCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartCursor::Beginning => write!(f, "0"),
            StartCursor::Latest => write!(f, "$"),
        }
    }
}

impl FromStr for StartCursor {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(StartCursor::Beginning),
            "$" | ">" => Ok(StartCursor::Latest),
            other => Err(TypeError::InvalidCursor(other.to_string())),
        }
    }
}

// ============================================================================
// Data Type - closed tagged variant with an explicit unknown case
// ============================================================================

/// Domain of an ingested record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum DataType {
    Healthcare,
    Finance,
    /// Any other tag. Kept verbatim so it round-trips through storage.
    Unknown(String),
}

impl DataType {
    pub fn as_str(&self) -> &str {
        match self {
            DataType::Healthcare => "healthcare",
            DataType::Finance => "finance",
            DataType::Unknown(tag) => tag,
        }
    }

    /// Produces a one-line summary of an anonymized record.
    ///
    /// Missing fields render as `N/A`.
    pub fn summarize(&self, fields: &Map<String, Value>) -> String {
        match self {
            DataType::Healthcare => format!(
                "Healthcare record for patient {}: Diagnosis - {}, Treatment - {}.",
                field_text(fields, "patient_id"),
                field_text(fields, "diagnosis"),
                field_text(fields, "treatment_plan"),
            ),
            DataType::Finance => format!(
                "Finance transaction for account {}: Type - {}, Amount - {}.",
                field_text(fields, "account_hash"),
                field_text(fields, "transaction_type"),
                field_text(fields, "amount"),
            ),
            DataType::Unknown(_) => "Unknown data type.".to_string(),
        }
    }
}

fn field_text(fields: &Map<String, Value>, name: &str) -> String {
    match fields.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "N/A".to_string(),
        Some(other) => other.to_string(),
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for DataType {
    fn from(tag: &str) -> Self {
        match tag {
            "healthcare" => DataType::Healthcare,
            "finance" => DataType::Finance,
            other => DataType::Unknown(other.to_string()),
        }
    }
}

impl From<String> for DataType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "healthcare" => DataType::Healthcare,
            "finance" => DataType::Finance,
            _ => DataType::Unknown(tag),
        }
    }
}

impl From<DataType> for String {
    fn from(value: DataType) -> Self {
        match value {
            DataType::Unknown(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

// ============================================================================
// Records - NOT Copy (heap-allocated field maps)
// ============================================================================

/// A record as submitted by a producer, before anonymization.
///
/// Contains personally identifying values. Never persisted, never logged.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Parses a JSON object from bytes.
    ///
    /// # Errors
    ///
    /// - [`TypeError::InvalidJson`] if the bytes are not JSON
    /// - [`TypeError::NotAnObject`] if the JSON is not an object
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, TypeError> {
        match serde_json::from_slice::<Value>(bytes)? {
            Value::Object(fields) => Ok(Self(fields)),
            _ => Err(TypeError::NotAnObject),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

impl Debug for RawRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawRecord")
            .field("fields", &self.0.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A record with identifying fields replaced.
///
/// Produced by the anonymization transform and recovered by decryption.
/// Keys are kept sorted, so serialization is canonical.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnonymizedRecord(Map<String, Value>);

impl AnonymizedRecord {
    /// Wraps fields that have already been through the anonymization transform.
    pub fn from_transformed(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

impl Debug for AnonymizedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnonymizedRecord")
            .field("fields", &self.0.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A persisted row: one encrypted blob per anonymized record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: RecordId,
    /// Opaque `nonce || ciphertext || tag`.
    pub data: Bytes,
    pub data_type: DataType,
    /// Hex SHA-256 of the base64-encoded blob. Audit only, never a lookup key.
    pub data_hash: String,
    pub created_at: DateTime<Utc>,
}

impl StoredRecord {
    pub fn new(id: RecordId, data: Bytes, data_type: DataType, data_hash: String) -> Self {
        Self {
            id,
            data,
            data_type,
            data_hash,
            created_at: Utc::now(),
        }
    }
}

// ============================================================================
// Ingestion Envelope - carried on the log and over RPC
// ============================================================================

/// Field names used when an envelope is flattened onto the log.
pub mod envelope_fields {
    pub const ID: &str = "id";
    pub const DATA_TYPE: &str = "data_type";
    pub const DATA: &str = "data";
}

/// Submission of one raw record.
///
/// `id` is only set on the RPC path; on the log path the id is assigned
/// when the message is consumed.
#[derive(Clone, PartialEq, Eq)]
pub struct IngestEnvelope {
    pub id: Option<RecordId>,
    pub data_type: DataType,
    /// JSON-encoded raw record.
    pub data: Bytes,
}

impl IngestEnvelope {
    pub fn new(data_type: DataType, data: impl Into<Bytes>) -> Self {
        Self {
            id: None,
            data_type,
            data: data.into(),
        }
    }

    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }

    /// Flattens the envelope into log message fields.
    pub fn to_fields(&self) -> BTreeMap<String, Bytes> {
        let mut fields = BTreeMap::new();
        if let Some(id) = self.id {
            fields.insert(envelope_fields::ID.to_string(), Bytes::from(id.to_string()));
        }
        fields.insert(
            envelope_fields::DATA_TYPE.to_string(),
            Bytes::from(self.data_type.to_string()),
        );
        fields.insert(envelope_fields::DATA.to_string(), self.data.clone());
        fields
    }

    /// Rebuilds an envelope from log message fields.
    ///
    /// # Errors
    ///
    /// - [`TypeError::MissingField`] if `data_type` or `data` is absent
    /// - [`TypeError::InvalidUtf8`] if a text field is not UTF-8
    /// - [`TypeError::InvalidRecordId`] if `id` is present but malformed
    pub fn from_fields(fields: &BTreeMap<String, Bytes>) -> Result<Self, TypeError> {
        let data_type = fields
            .get(envelope_fields::DATA_TYPE)
            .ok_or(TypeError::MissingField(envelope_fields::DATA_TYPE))?;
        let data_type = std::str::from_utf8(data_type)
            .map_err(|_| TypeError::InvalidUtf8(envelope_fields::DATA_TYPE))?;

        let data = fields
            .get(envelope_fields::DATA)
            .ok_or(TypeError::MissingField(envelope_fields::DATA))?
            .clone();

        let id = match fields.get(envelope_fields::ID) {
            Some(raw) => {
                let text = std::str::from_utf8(raw)
                    .map_err(|_| TypeError::InvalidUtf8(envelope_fields::ID))?;
                Some(text.parse()?)
            }
            None => None,
        };

        Ok(Self {
            id,
            data_type: DataType::from(data_type),
            data,
        })
    }
}

impl Debug for IngestEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestEnvelope")
            .field("id", &self.id)
            .field("data_type", &self.data_type)
            .field("data_len", &self.data.len())
            .finish()
    }
}

// ============================================================================
// Gateway Responses
// ============================================================================

/// Outcome reported by the synchronous ingest entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IngestStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "ERROR")]
    Error,
}

impl Display for IngestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestStatus::Ok => write!(f, "OK"),
            IngestStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Response to `Ingest`. `id` is `None` when the status is `ERROR`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestResponse {
    pub id: Option<RecordId>,
    pub status: IngestStatus,
}

impl IngestResponse {
    pub fn ok(id: RecordId) -> Self {
        Self {
            id: Some(id),
            status: IngestStatus::Ok,
        }
    }

    pub fn error() -> Self {
        Self {
            id: None,
            status: IngestStatus::Error,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == IngestStatus::Ok
    }
}

/// Response to `Retrieve`: the decrypted, anonymized record.
#[derive(Clone, PartialEq)]
pub struct RetrieveResponse {
    pub data_type: DataType,
    pub data: AnonymizedRecord,
}

impl RetrieveResponse {
    /// Serializes the record back to JSON bytes for the wire.
    pub fn data_json(&self) -> Result<Vec<u8>, TypeError> {
        Ok(serde_json::to_vec(&self.data)?)
    }
}

impl Debug for RetrieveResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrieveResponse")
            .field("data_type", &self.data_type)
            .field("data", &self.data)
            .finish()
    }
}

#[cfg(test)]
mod tests;
