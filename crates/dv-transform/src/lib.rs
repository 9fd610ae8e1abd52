//! # dv-transform: Anonymization for `DataVault`
//!
//! Replaces identifying fields of a raw record before it is encrypted:
//! names are swapped for synthetic names with the same initial, and numeric
//! fields such as `age` receive bounded additive noise.
//!
//! The transform is pure apart from its random source. It performs no I/O
//! and never logs record values.
//!
//! ```
//! use dv_transform::Anonymizer;
//! use dv_types::RawRecord;
//!
//! let raw = RawRecord::from_json_bytes(
//!     br#"{"first_name": "Alice", "last_name": "Smith", "age": 30}"#,
//! ).unwrap();
//!
//! let anon = Anonymizer::default().anonymize(&raw);
//! assert!(anon.get_str("first_name").unwrap().starts_with('A'));
//! assert!(anon.get_str("last_name").unwrap().starts_with('S'));
//! ```

pub mod anonymizer;
pub mod config;
pub mod names;

pub use anonymizer::{Anonymizer, perturb, replacement_name};
pub use config::{AnonymizerConfig, NoiseLevels, Sensitivity};
pub use names::{FIRST_NAME_SENTINEL, LAST_NAME_SENTINEL, NameKind};

/// Errors raised when configuring the transform.
///
/// Anonymizing a record never fails.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("noise magnitude for {sensitivity:?} must be finite and >= 0, got {magnitude}")]
    InvalidNoise {
        sensitivity: Sensitivity,
        magnitude: f64,
    },

    #[error("name field `{0}` cannot be configured for numeric noise")]
    NameFieldNotNumeric(String),
}
