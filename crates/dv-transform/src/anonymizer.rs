//! The anonymization transform.
//!
//! ```text
//! first_name  →  random entry of FIRST_NAMES[initial]   (or "AnonF")
//! last_name   →  random entry of LAST_NAMES[initial]    (or "AnonL")
//! age         →  max(0, round(age + U[-N, N]))
//! other       →  copied unchanged
//! ```
//!
//! Nothing about the original value survives except the initial of a name,
//! and no mapping from original to replacement is kept anywhere.

use rand::Rng;
use serde_json::{Map, Number, Value};

use dv_types::{AnonymizedRecord, RawRecord};

use crate::TransformError;
use crate::config::{AnonymizerConfig, FIRST_NAME_FIELD, LAST_NAME_FIELD};
use crate::names::NameKind;

/// Applies name substitution and numeric noise to raw records.
///
/// Stateless apart from its configuration; the random source is supplied
/// per call, so a seeded generator gives reproducible output in tests.
#[derive(Debug, Clone, Default)]
pub struct Anonymizer {
    config: AnonymizerConfig,
}

impl Anonymizer {
    /// Builds an anonymizer after validating `config`.
    pub fn new(config: AnonymizerConfig) -> Result<Self, TransformError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnonymizerConfig {
        &self.config
    }

    /// Anonymizes a record using the thread-local random source.
    pub fn anonymize(&self, record: &RawRecord) -> AnonymizedRecord {
        self.anonymize_with(record, &mut rand::thread_rng())
    }

    /// Anonymizes a record with an explicit random source.
    ///
    /// Never fails. A name or noisy field whose value has the wrong type is
    /// dropped rather than copied, so an unexpected shape cannot leak the
    /// original value.
    pub fn anonymize_with<R: Rng + ?Sized>(
        &self,
        record: &RawRecord,
        rng: &mut R,
    ) -> AnonymizedRecord {
        let mut out = Map::with_capacity(record.fields().len());

        for (field, value) in record.fields() {
            let replaced = if field == FIRST_NAME_FIELD {
                substitute_name(value, NameKind::First, rng)
            } else if field == LAST_NAME_FIELD {
                substitute_name(value, NameKind::Last, rng)
            } else if let Some(max_noise) = self.config.max_noise_for(field) {
                perturb_value(value, max_noise, rng)
            } else {
                Some(value.clone())
            };

            if let Some(replaced) = replaced {
                out.insert(field.clone(), replaced);
            }
        }

        debug_assert!(out.len() <= record.fields().len());
        AnonymizedRecord::from_transformed(out)
    }
}

// ============================================================================
// Names
// ============================================================================

/// Draws a synthetic name sharing the initial of `original`.
///
/// Falls back to the sentinel when the initial is not an ASCII letter,
/// including the empty string.
pub fn replacement_name<R: Rng + ?Sized>(original: &str, kind: NameKind, rng: &mut R) -> &'static str {
    match original.chars().next().and_then(|c| kind.candidates(c)) {
        Some(candidates) => candidates[rng.gen_range(0..candidates.len())],
        None => kind.sentinel(),
    }
}

fn substitute_name<R: Rng + ?Sized>(value: &Value, kind: NameKind, rng: &mut R) -> Option<Value> {
    match value {
        Value::String(original) => Some(Value::String(
            replacement_name(original, kind, rng).to_string(),
        )),
        _ => None,
    }
}

// ============================================================================
// Numeric noise
// ============================================================================

/// Adds uniform noise in `[-max_noise, max_noise]`, rounds, and clamps at 0.
pub fn perturb<R: Rng + ?Sized>(value: f64, max_noise: f64, rng: &mut R) -> i64 {
    debug_assert!(max_noise.is_finite() && max_noise >= 0.0);

    let noise = if max_noise > 0.0 {
        rng.gen_range(-max_noise..=max_noise)
    } else {
        0.0
    };
    let noisy = (value + noise).round().max(0.0);

    // `as` saturates for out-of-range floats.
    noisy as i64
}

fn perturb_value<R: Rng + ?Sized>(value: &Value, max_noise: f64, rng: &mut R) -> Option<Value> {
    let original = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !original.is_finite() {
        return None;
    }
    Some(Value::Number(Number::from(perturb(original, max_noise, rng))))
}
