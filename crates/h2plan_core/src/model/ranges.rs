use serde::{Deserialize, Serialize};

use crate::error::RangeError;

/// A discretized exploration range for one variable.
///
/// The induced sample values are `min_value, min_value + step, ...` up to and
/// including `max_value` (within float tolerance); see
/// [`crate::combinatorics::sample_values`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableRange {
    pub name: String,
    pub display_name: String,
    pub min_value: f64,
    pub max_value: f64,
    pub step: f64,
    #[serde(default)]
    pub unit: String,
}

impl VariableRange {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        min_value: f64,
        max_value: f64,
        step: f64,
        unit: impl Into<String>,
    ) -> Result<Self, RangeError> {
        let range = Self {
            name: name.into(),
            display_name: display_name.into(),
            min_value,
            max_value,
            step,
            unit: unit.into(),
        };
        range.validate()?;
        Ok(range)
    }

    /// Check the `min <= max`, `step > 0` invariants.
    pub fn validate(&self) -> Result<(), RangeError> {
        if !(self.step > 0.0) {
            return Err(RangeError::NonPositiveStep {
                name: self.name.clone(),
                step: self.step,
            });
        }
        if self.min_value > self.max_value {
            return Err(RangeError::InvertedBounds {
                name: self.name.clone(),
                min: self.min_value,
                max: self.max_value,
            });
        }
        Ok(())
    }
}
