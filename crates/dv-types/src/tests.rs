//! Unit tests for dv-types

use std::collections::BTreeMap;

use bytes::Bytes;
use serde_json::json;

use crate::{
    AnonymizedRecord, DataType, IngestEnvelope, IngestResponse, IngestStatus, MessageId,
    RawRecord, RecordId, StartCursor, TypeError, envelope_fields,
};

// ============================================================================
// ID Type Tests
// ============================================================================

#[test]
fn random_record_ids_are_distinct() {
    let a = RecordId::new_random();
    let b = RecordId::new_random();
    assert_ne!(a, b);
    assert!(!a.is_nil());
}

#[test]
fn record_id_display_parse_roundtrip() {
    let id = RecordId::new_random();
    let parsed: RecordId = id.to_string().parse().unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn record_id_rejects_garbage() {
    let result = "not-a-uuid".parse::<RecordId>();
    assert!(matches!(result, Err(TypeError::InvalidRecordId(_))));
}

#[test]
fn derived_record_id_is_stable_per_message() {
    let msg = MessageId::new(1_700_000_000_000, 3);
    let first = RecordId::derived("ingestion_stream", &msg);
    let second = RecordId::derived("ingestion_stream", &msg);
    assert_eq!(first, second);
}

#[test]
fn derived_record_id_differs_across_messages_and_streams() {
    let a = RecordId::derived("ingestion_stream", &MessageId::new(1, 0));
    let b = RecordId::derived("ingestion_stream", &MessageId::new(1, 1));
    let c = RecordId::derived("other_stream", &MessageId::new(1, 0));
    assert_ne!(a, b);
    assert_ne!(a, c);
}

#[test]
fn message_id_display_and_parse() {
    let id = MessageId::new(1_526_919_030_474, 55);
    assert_eq!(id.to_string(), "1526919030474-55");
    assert_eq!("1526919030474-55".parse::<MessageId>().unwrap(), id);
}

#[test]
fn message_id_rejects_malformed() {
    assert!("12345".parse::<MessageId>().is_err());
    assert!("a-1".parse::<MessageId>().is_err());
    assert!("1-b".parse::<MessageId>().is_err());
}

#[test]
fn message_id_orders_by_millis_then_seq() {
    assert!(MessageId::new(1, 9) < MessageId::new(2, 0));
    assert!(MessageId::new(2, 0) < MessageId::new(2, 1));
    assert_eq!(MessageId::new(2, 0).successor(), MessageId::new(2, 1));
}

#[test]
fn start_cursor_parses_wire_forms() {
    assert_eq!("0".parse::<StartCursor>().unwrap(), StartCursor::Beginning);
    assert_eq!("$".parse::<StartCursor>().unwrap(), StartCursor::Latest);
    assert_eq!(">".parse::<StartCursor>().unwrap(), StartCursor::Latest);
    assert!("latest".parse::<StartCursor>().is_err());
}

// ============================================================================
// DataType Tests
// ============================================================================

#[test]
fn data_type_from_known_tags() {
    assert_eq!(DataType::from("healthcare"), DataType::Healthcare);
    assert_eq!(DataType::from("finance"), DataType::Finance);
}

#[test]
fn data_type_keeps_unknown_tag_verbatim() {
    let tag = DataType::from("insurance");
    assert_eq!(tag, DataType::Unknown("insurance".to_string()));
    assert_eq!(tag.to_string(), "insurance");
}

#[test]
fn data_type_serializes_as_plain_string() {
    let encoded = serde_json::to_string(&DataType::Finance).unwrap();
    assert_eq!(encoded, "\"finance\"");

    let decoded: DataType = serde_json::from_str("\"healthcare\"").unwrap();
    assert_eq!(decoded, DataType::Healthcare);
}

#[test]
fn healthcare_summary_uses_clinical_fields() {
    let record = json!({
        "patient_id": "10001",
        "diagnosis": "Asthma",
        "treatment_plan": "Medication A",
    });
    let summary = DataType::Healthcare.summarize(record.as_object().unwrap());
    assert_eq!(
        summary,
        "Healthcare record for patient 10001: Diagnosis - Asthma, Treatment - Medication A."
    );
}

#[test]
fn finance_summary_renders_numbers_and_missing_fields() {
    let record = json!({ "account_hash": "ab12", "amount": 250.5 });
    let summary = DataType::Finance.summarize(record.as_object().unwrap());
    assert_eq!(
        summary,
        "Finance transaction for account ab12: Type - N/A, Amount - 250.5."
    );
}

#[test]
fn unknown_summary_is_fixed_text() {
    let record = json!({ "anything": 1 });
    let summary = DataType::from("insurance").summarize(record.as_object().unwrap());
    assert_eq!(summary, "Unknown data type.");
}

// ============================================================================
// Record Tests
// ============================================================================

#[test]
fn raw_record_parses_objects_only() {
    let record = RawRecord::from_json_bytes(br#"{"first_name":"Alice","age":30}"#).unwrap();
    assert_eq!(record.get("age"), Some(&json!(30)));

    assert!(matches!(
        RawRecord::from_json_bytes(b"[1,2,3]"),
        Err(TypeError::NotAnObject)
    ));
    assert!(matches!(
        RawRecord::from_json_bytes(b"{not json"),
        Err(TypeError::InvalidJson(_))
    ));
}

#[test]
fn record_debug_never_shows_values() {
    let record = RawRecord::from_json_bytes(br#"{"first_name":"Alice","last_name":"Smith"}"#)
        .unwrap();
    let rendered = format!("{record:?}");
    assert!(rendered.contains("first_name"));
    assert!(!rendered.contains("Alice"));
    assert!(!rendered.contains("Smith"));

    let anonymized = AnonymizedRecord::from_transformed(record.into_fields());
    assert!(!format!("{anonymized:?}").contains("Alice"));
}

#[test]
fn anonymized_record_serializes_with_sorted_keys() {
    let record = AnonymizedRecord::from_transformed(
        json!({ "zeta": 1, "alpha": 2, "mid": 3 })
            .as_object()
            .unwrap()
            .clone(),
    );
    let encoded = serde_json::to_string(&record).unwrap();
    assert_eq!(encoded, r#"{"alpha":2,"mid":3,"zeta":1}"#);
}

// ============================================================================
// Envelope Tests
// ============================================================================

#[test]
fn envelope_fields_roundtrip_without_id() {
    let envelope = IngestEnvelope::new(DataType::Healthcare, Bytes::from_static(b"{}"));
    let fields = envelope.to_fields();
    assert!(!fields.contains_key(envelope_fields::ID));

    let parsed = IngestEnvelope::from_fields(&fields).unwrap();
    assert_eq!(parsed, envelope);
}

#[test]
fn envelope_fields_roundtrip_with_id() {
    let id = RecordId::new_random();
    let envelope = IngestEnvelope::new(DataType::Finance, Bytes::from_static(b"{}")).with_id(id);
    let parsed = IngestEnvelope::from_fields(&envelope.to_fields()).unwrap();
    assert_eq!(parsed.id, Some(id));
}

#[test]
fn envelope_missing_data_is_rejected() {
    let mut fields = BTreeMap::new();
    fields.insert(
        envelope_fields::DATA_TYPE.to_string(),
        Bytes::from_static(b"healthcare"),
    );
    assert!(matches!(
        IngestEnvelope::from_fields(&fields),
        Err(TypeError::MissingField("data"))
    ));
}

#[test]
fn envelope_rejects_non_utf8_data_type() {
    let mut fields = BTreeMap::new();
    fields.insert(
        envelope_fields::DATA_TYPE.to_string(),
        Bytes::from_static(&[0xff, 0xfe]),
    );
    fields.insert(envelope_fields::DATA.to_string(), Bytes::from_static(b"{}"));
    assert!(matches!(
        IngestEnvelope::from_fields(&fields),
        Err(TypeError::InvalidUtf8("data_type"))
    ));
}

#[test]
fn ingest_status_wire_strings() {
    assert_eq!(IngestStatus::Ok.to_string(), "OK");
    assert_eq!(IngestStatus::Error.to_string(), "ERROR");
    assert!(!IngestResponse::error().is_ok());
    assert!(IngestResponse::error().id.is_none());
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn message_id_parse_inverts_display(millis in any::<u64>(), seq in any::<u64>()) {
            let id = MessageId::new(millis, seq);
            prop_assert_eq!(id.to_string().parse::<MessageId>().unwrap(), id);
        }

        #[test]
        fn data_type_string_roundtrip(tag in "[a-z_]{1,16}") {
            let data_type = DataType::from(tag.as_str());
            prop_assert_eq!(String::from(data_type), tag);
        }
    }
}
