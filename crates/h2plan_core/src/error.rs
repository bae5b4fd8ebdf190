use std::fmt;

use crate::model::Kpi;

/// Errors raised when a variable range is malformed
#[derive(Debug, Clone, PartialEq)]
pub enum RangeError {
    NonPositiveStep { name: String, step: f64 },
    InvertedBounds { name: String, min: f64, max: f64 },
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeError::NonPositiveStep { name, step } => {
                write!(f, "range '{name}' has non-positive step {step}")
            }
            RangeError::InvertedBounds { name, min, max } => {
                write!(f, "range '{name}' has min {min} greater than max {max}")
            }
        }
    }
}

impl std::error::Error for RangeError {}

/// Errors raised when assembling a set of KPI targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSetError {
    Empty,
    TooMany(usize),
    DuplicateKpi(Kpi),
}

impl fmt::Display for TargetSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSetError::Empty => write!(f, "at least one KPI target is required"),
            TargetSetError::TooMany(count) => {
                write!(f, "too many KPI targets ({count}, maximum is 4)")
            }
            TargetSetError::DuplicateKpi(kpi) => {
                write!(f, "duplicate target for KPI '{}'", kpi.as_str())
            }
        }
    }
}

impl std::error::Error for TargetSetError {}

/// Parse failure for a sweep target KPI name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKpi(pub String);

impl fmt::Display for UnknownKpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown target KPI '{}' (expected npv_p50, irr_p50 or lcoh)",
            self.0
        )
    }
}

impl std::error::Error for UnknownKpi {}
