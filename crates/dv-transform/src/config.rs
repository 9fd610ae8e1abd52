//! Anonymizer configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::TransformError;

/// Field holding a first name.
pub const FIRST_NAME_FIELD: &str = "first_name";

/// Field holding a last name.
pub const LAST_NAME_FIELD: &str = "last_name";

/// Field holding an age in years.
pub const AGE_FIELD: &str = "age";

/// How revealing a numeric field is, and therefore how much noise it gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    Low,
    Moderate,
    High,
}

/// Maximum absolute noise per sensitivity class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseLevels {
    pub low: f64,
    pub moderate: f64,
    pub high: f64,
}

impl NoiseLevels {
    pub fn magnitude(&self, sensitivity: Sensitivity) -> f64 {
        match sensitivity {
            Sensitivity::Low => self.low,
            Sensitivity::Moderate => self.moderate,
            Sensitivity::High => self.high,
        }
    }

    fn set(&mut self, sensitivity: Sensitivity, magnitude: f64) {
        match sensitivity {
            Sensitivity::Low => self.low = magnitude,
            Sensitivity::Moderate => self.moderate = magnitude,
            Sensitivity::High => self.high = magnitude,
        }
    }
}

impl Default for NoiseLevels {
    fn default() -> Self {
        Self {
            low: 1.0,
            moderate: 3.0,
            high: 5.0,
        }
    }
}

/// Configuration for the anonymization transform.
///
/// By default only `age` is perturbed, as a [`Sensitivity::Moderate`] field
/// with a maximum noise of 3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonymizerConfig {
    /// Numeric fields that receive additive noise, by sensitivity.
    pub noisy_fields: BTreeMap<String, Sensitivity>,
    /// Noise magnitude for each sensitivity class.
    pub noise: NoiseLevels,
}

impl AnonymizerConfig {
    /// Creates a configuration with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or reclassifies a numeric field.
    pub fn with_noisy_field(mut self, field: impl Into<String>, sensitivity: Sensitivity) -> Self {
        self.noisy_fields.insert(field.into(), sensitivity);
        self
    }

    /// Stops perturbing a field. It is then copied through unchanged.
    pub fn without_noisy_field(mut self, field: &str) -> Self {
        self.noisy_fields.remove(field);
        self
    }

    /// Sets the maximum noise for a sensitivity class.
    pub fn with_noise(mut self, sensitivity: Sensitivity, magnitude: f64) -> Self {
        self.noise.set(sensitivity, magnitude);
        self
    }

    /// Maximum noise applied to `field`, if it is perturbed at all.
    pub fn max_noise_for(&self, field: &str) -> Option<f64> {
        self.noisy_fields
            .get(field)
            .map(|sensitivity| self.noise.magnitude(*sensitivity))
    }

    /// Checks that every magnitude is finite and non-negative.
    pub fn validate(&self) -> Result<(), TransformError> {
        for sensitivity in [Sensitivity::Low, Sensitivity::Moderate, Sensitivity::High] {
            let magnitude = self.noise.magnitude(sensitivity);
            if !magnitude.is_finite() || magnitude < 0.0 {
                return Err(TransformError::InvalidNoise {
                    sensitivity,
                    magnitude,
                });
            }
        }
        for field in self.noisy_fields.keys() {
            if field == FIRST_NAME_FIELD || field == LAST_NAME_FIELD {
                return Err(TransformError::NameFieldNotNumeric(field.clone()));
            }
        }
        Ok(())
    }
}

impl Default for AnonymizerConfig {
    fn default() -> Self {
        let mut noisy_fields = BTreeMap::new();
        noisy_fields.insert(AGE_FIELD.to_string(), Sensitivity::Moderate);
        Self {
            noisy_fields,
            noise: NoiseLevels::default(),
        }
    }
}
