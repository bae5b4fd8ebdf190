//! Key-casing normalization at the worker boundary
//!
//! The worker speaks snake_case, the presentation layer speaks camelCase.
//! [`to_wire_format`] and [`to_internal_format`] convert every key of a
//! nested JSON structure between the two conventions, recursing into objects
//! and arrays while leaving scalar values untouched.
//!
//! Both directions are total and idempotent: a key with no separator or
//! uppercase boundary passes through unchanged, and consecutive separators
//! never panic. Restricted to keys built from ASCII letters, digits and
//! underscores (everything in the variable catalog), the pair is a lossless
//! bijection: `to_internal_format(to_wire_format(x)) == x`.

use serde_json::Value;

/// "h2_price" -> "h2Price". Already-camel input passes through unchanged.
pub fn snake_to_camel(key: &str) -> String {
    let mut segments = key.split('_').filter(|s| !s.is_empty());
    let Some(first) = segments.next() else {
        return key.to_string();
    };

    let mut out = String::with_capacity(key.len());
    out.push_str(first);
    for segment in segments {
        let mut chars = segment.chars();
        if let Some(head) = chars.next() {
            out.push(head.to_ascii_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// "h2Price" -> "h2_price". Already-snake input passes through unchanged.
///
/// An underscore is inserted at lower/digit-to-upper boundaries and before
/// the final capital of an acronym run ("npvSwing" -> "npv_swing",
/// "NPVSwing" -> "npv_swing").
pub fn camel_to_snake(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let after_lower_or_digit = i > 0
                && (chars[i - 1].is_ascii_lowercase() || chars[i - 1].is_ascii_digit());
            let acronym_end = i > 0
                && chars[i - 1].is_ascii_uppercase()
                && chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            if after_lower_or_digit || acronym_end {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Recursively convert every key of `value` to the worker's snake_case.
pub fn to_wire_format(value: &Value) -> Value {
    transform_keys(value, &camel_to_snake)
}

/// Recursively convert every key of `value` to the internal camelCase.
pub fn to_internal_format(value: &Value) -> Value {
    transform_keys(value, &snake_to_camel)
}

fn transform_keys(value: &Value, convert: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, inner)| (convert(key), transform_keys(inner, convert)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| transform_keys(item, convert))
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::catalog::VariableCatalog;

    #[test]
    fn test_snake_to_camel() {
        assert_eq!(snake_to_camel("hello_world"), "helloWorld");
        assert_eq!(snake_to_camel("h2_price"), "h2Price");
        assert_eq!(snake_to_camel("electrolyzer_capacity"), "electrolyzerCapacity");
        assert_eq!(snake_to_camel("lcoh"), "lcoh");
    }

    #[test]
    fn test_camel_to_snake() {
        assert_eq!(camel_to_snake("helloWorld"), "hello_world");
        assert_eq!(camel_to_snake("h2Price"), "h2_price");
        assert_eq!(camel_to_snake("npvP50"), "npv_p50");
        assert_eq!(camel_to_snake("NPVSwing"), "npv_swing");
        assert_eq!(camel_to_snake("lcoh"), "lcoh");
    }

    #[test]
    fn test_degenerate_keys_do_not_panic() {
        // consecutive and leading separators collapse instead of erroring
        assert_eq!(snake_to_camel("a__b"), "aB");
        assert_eq!(snake_to_camel("_"), "_");
        assert_eq!(snake_to_camel(""), "");
        assert_eq!(camel_to_snake(""), "");
    }

    #[test]
    fn test_both_directions_are_idempotent() {
        for key in ["electrolyzerCapacity", "h2Price", "progress"] {
            assert_eq!(snake_to_camel(key), key);
        }
        for key in ["electrolyzer_capacity", "h2_price", "progress"] {
            assert_eq!(camel_to_snake(key), key);
        }
    }

    #[test]
    fn test_round_trip_over_catalog_names() {
        // toInternalFormat(toWireFormat(x)) == x for catalog-derived keys
        let catalog = VariableCatalog::standard();
        for variable in catalog.variables() {
            let camel = snake_to_camel(&variable.name);
            assert_eq!(camel_to_snake(&camel), variable.name);
        }
    }

    #[test]
    fn test_recursive_conversion_preserves_structure() {
        let internal = json!({
            "baseInput": {
                "equipment": { "electrolyzerCapacity": 10.0 },
                "market": { "h2Price": 6000.0 }
            },
            "variableRanges": [
                { "name": "capex", "minValue": 1.0e10, "maxValue": 3.0e10, "step": 1.0e10 }
            ],
            "targetKpi": "npv_p50"
        });

        let wire = to_wire_format(&internal);
        assert_eq!(
            wire["base_input"]["equipment"]["electrolyzer_capacity"],
            json!(10.0)
        );
        assert_eq!(wire["variable_ranges"][0]["min_value"], json!(1.0e10));
        // scalar values are untouched, even when they look like keys
        assert_eq!(wire["target_kpi"], json!("npv_p50"));

        assert_eq!(to_internal_format(&wire), internal);
    }
}
