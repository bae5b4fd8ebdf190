//! Targeted application of AI-proposed parameter sets
//!
//! Recommendation keys arrive in whatever convention the producer used:
//! snake_case, camelCase, or a legacy alias. Each key resolves through the
//! catalog to exactly one field of the base configuration's nested groups and
//! overwrites only that field; everything else in the base is left untouched.
//! Unknown keys and values that fail numeric coercion never abort the merge,
//! they are reported back as unapplied.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::catalog::VariableCatalog;
use crate::config::BaseInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnappliedReason {
    UnknownVariable,
    NotNumeric,
}

/// One recommendation key that could not be merged, for caller visibility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnappliedKey {
    pub key: String,
    pub reason: UnappliedReason,
}

/// Outcome of merging a recommendation into a base configuration.
#[derive(Debug, Clone)]
pub struct AppliedRecommendation {
    pub input: BaseInput,
    /// Canonical variable name and the value written, in merge order
    pub applied: Vec<(String, f64)>,
    pub unapplied: Vec<UnappliedKey>,
}

/// Merge `recommended` into a copy of `base`, field by field.
pub fn apply_recommendation(
    base: &BaseInput,
    recommended: &Map<String, Value>,
    catalog: &VariableCatalog,
) -> AppliedRecommendation {
    let mut input = base.clone();
    let mut applied = Vec::new();
    let mut unapplied = Vec::new();

    for (key, raw) in recommended {
        let Some(variable) = catalog.resolve(key) else {
            unapplied.push(UnappliedKey {
                key: key.clone(),
                reason: UnappliedReason::UnknownVariable,
            });
            continue;
        };
        let Some(value) = coerce_numeric(raw) else {
            unapplied.push(UnappliedKey {
                key: key.clone(),
                reason: UnappliedReason::NotNumeric,
            });
            continue;
        };
        if assign(&mut input, &variable.name, value) {
            applied.push((variable.name.clone(), value));
        } else {
            unapplied.push(UnappliedKey {
                key: key.clone(),
                reason: UnappliedReason::UnknownVariable,
            });
        }
    }

    AppliedRecommendation {
        input,
        applied,
        unapplied,
    }
}

/// Values may arrive as JSON numbers or numeric strings.
fn coerce_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Write one canonical variable into its configuration slot.
fn assign(input: &mut BaseInput, name: &str, value: f64) -> bool {
    match name {
        "electrolyzer_capacity" => input.equipment.electrolyzer_capacity = value,
        "electrolyzer_efficiency" => input.equipment.electrolyzer_efficiency = value,
        "annual_availability" => input.equipment.annual_availability = value,
        "ppa_price" => input.cost.ppa_price = Some(value),
        "capex" => input.cost.capex = value,
        "h2_price" => input.market.h2_price = value,
        "discount_rate" => input.financial.discount_rate = value,
        "debt_ratio" => input.financial.debt_ratio = value,
        _ => return false,
    }
    true
}
