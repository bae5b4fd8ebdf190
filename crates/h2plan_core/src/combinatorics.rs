//! Combination-space sizing for sweep feasibility checks
//!
//! A sweep evaluates the Cartesian product of each range's induced samples.
//! The product can get large fast, so the size is computed without
//! materializing any combinations and checked against a caller-supplied
//! ceiling before a job is ever submitted.

use crate::model::VariableRange;

/// Relative slack absorbing float drift when a span is an exact multiple of
/// the step (e.g. (10 - 0) / 2 landing at 4.999999...).
const STEP_EPSILON: f64 = 1e-6;

/// Number of samples induced by one range: `floor((max - min) / step) + 1`,
/// never less than 1.
pub fn sample_count(range: &VariableRange) -> u64 {
    let span = (range.max_value - range.min_value).max(0.0);
    (span / range.step + STEP_EPSILON).floor() as u64 + 1
}

/// Total number of combinations across all ranges.
///
/// An empty range list yields 0: exploring nothing is "no combinations",
/// distinct from the single combination of a fixed-value range.
pub fn combination_count(ranges: &[VariableRange]) -> u64 {
    if ranges.is_empty() {
        return 0;
    }
    ranges.iter().map(sample_count).product()
}

/// Materialize the sample values of one range, rounded to 6 decimals the way
/// the worker generates them.
pub fn sample_values(range: &VariableRange) -> Vec<f64> {
    let mut values = Vec::with_capacity(sample_count(range) as usize);
    let mut current = range.min_value;
    while current <= range.max_value + range.step * 1e-3 {
        values.push(round6(current));
        current += range.step;
    }
    values
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}
