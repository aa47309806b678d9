//! # Validation Layer
//!
//! Shape and range checks applied to raw input before any store access. Each check either
//! passes silently or returns a [`ValidationError`] naming the offending field with a
//! human-readable message.
//!
//! Payloads arrive as `serde_json::Value` (bodies) or string maps (query parameters). Query
//! parameters are lifted into a JSON object of strings so both paths share one set of rules.
//! Numeric strings are accepted wherever an integer is expected.
//!
//! Objects are strict: fields are checked in schema order, then any key outside the schema
//! is rejected. The first failure wins.

mod catalog;
mod stock;

pub use stock::parse_id;

use serde_json::{Map, Value};
use std::collections::HashMap;

/// Largest integer that survives a round trip through an IEEE double.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A rejected input: which field, and why.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, reason: &str) -> Self {
        Self {
            field: field.to_string(),
            message: format!("\"{field}\" {reason}"),
        }
    }
}

/// Range rule for integer fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IntegerRule {
    /// Strictly greater than zero (identifiers).
    Positive,
    /// Zero or more (quantities and bounds).
    NonNegative,
}

pub(crate) fn object(body: &Value) -> Result<&Map<String, Value>, ValidationError> {
    body.as_object()
        .ok_or_else(|| ValidationError::new("value", "must be of type object"))
}

/// Lifts query parameters into a JSON object of strings.
pub(crate) fn query_object(query: &HashMap<String, String>) -> Map<String, Value> {
    query
        .iter()
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect()
}

pub(crate) fn reject_unknown(
    fields: &Map<String, Value>,
    allowed: &[&str],
) -> Result<(), ValidationError> {
    let mut unknown: Vec<&String> = fields
        .keys()
        .filter(|key| !allowed.contains(&key.as_str()))
        .collect();
    unknown.sort();
    match unknown.first() {
        Some(key) => Err(ValidationError::new(key, "is not allowed")),
        None => Ok(()),
    }
}

pub(crate) fn integer(field: &str, value: &Value, rule: IntegerRule) -> Result<i64, ValidationError> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_numeric(text),
        _ => None,
    }
    .ok_or_else(|| ValidationError::new(field, "must be a number"))?;

    if number.fract() != 0.0 {
        return Err(ValidationError::new(field, "must be an integer"));
    }
    if number.abs() > MAX_SAFE_INTEGER {
        return Err(ValidationError::new(field, "must be a safe number"));
    }
    match rule {
        IntegerRule::Positive if number <= 0.0 => {
            Err(ValidationError::new(field, "must be a positive number"))
        }
        IntegerRule::NonNegative if number < 0.0 => Err(ValidationError::new(
            field,
            "must be greater than or equal to 0",
        )),
        _ => Ok(number as i64),
    }
}

pub(crate) fn required_integer(
    fields: &Map<String, Value>,
    field: &str,
    rule: IntegerRule,
) -> Result<i64, ValidationError> {
    match fields.get(field) {
        Some(value) => integer(field, value, rule),
        None => Err(ValidationError::new(field, "is required")),
    }
}

pub(crate) fn optional_integer(
    fields: &Map<String, Value>,
    field: &str,
    rule: IntegerRule,
) -> Result<Option<i64>, ValidationError> {
    fields
        .get(field)
        .map(|value| integer(field, value, rule))
        .transpose()
}

fn string(field: &str, value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::String(text) if text.is_empty() => {
            Err(ValidationError::new(field, "is not allowed to be empty"))
        }
        Value::String(text) => Ok(text.clone()),
        _ => Err(ValidationError::new(field, "must be a string")),
    }
}

pub(crate) fn required_string(
    fields: &Map<String, Value>,
    field: &str,
) -> Result<String, ValidationError> {
    match fields.get(field) {
        Some(value) => string(field, value),
        None => Err(ValidationError::new(field, "is required")),
    }
}

pub(crate) fn optional_string(
    fields: &Map<String, Value>,
    field: &str,
) -> Result<Option<String>, ValidationError> {
    fields
        .get(field)
        .map(|value| string(field, value))
        .transpose()
}

fn parse_numeric(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|number| number.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integer_accepts_numbers_and_numeric_strings() {
        assert_eq!(integer("id", &json!(7), IntegerRule::Positive), Ok(7));
        assert_eq!(integer("id", &json!("7"), IntegerRule::Positive), Ok(7));
        assert_eq!(integer("id", &json!(" 12 "), IntegerRule::Positive), Ok(12));
        assert_eq!(integer("qty", &json!(4.0), IntegerRule::NonNegative), Ok(4));
        assert_eq!(integer("qty", &json!(0), IntegerRule::NonNegative), Ok(0));
    }

    #[test]
    fn integer_rejections_carry_field_messages() {
        let err = integer("id", &json!("abc"), IntegerRule::Positive).unwrap_err();
        assert_eq!(err.field, "id");
        assert_eq!(err.message, "\"id\" must be a number");

        let err = integer("id", &json!(1.5), IntegerRule::Positive).unwrap_err();
        assert_eq!(err.message, "\"id\" must be an integer");

        let err = integer("id", &json!(0), IntegerRule::Positive).unwrap_err();
        assert_eq!(err.message, "\"id\" must be a positive number");

        let err = integer("qty", &json!(-1), IntegerRule::NonNegative).unwrap_err();
        assert_eq!(err.message, "\"qty\" must be greater than or equal to 0");

        let err = integer("qty", &json!(null), IntegerRule::NonNegative).unwrap_err();
        assert_eq!(err.message, "\"qty\" must be a number");

        let err = integer("qty", &json!("NaN"), IntegerRule::NonNegative).unwrap_err();
        assert_eq!(err.message, "\"qty\" must be a number");

        let err = integer("qty", &json!(1e300), IntegerRule::NonNegative).unwrap_err();
        assert_eq!(err.message, "\"qty\" must be a safe number");
    }

    #[test]
    fn unknown_keys_are_reported_in_order() {
        let fields = json!({"zeta": 1, "alpha": 2, "plu": "x"});
        let err = reject_unknown(object(&fields).unwrap(), &["plu"]).unwrap_err();
        assert_eq!(err.message, "\"alpha\" is not allowed");
    }

    #[test]
    fn strings_must_be_present_and_non_empty() {
        let fields = json!({"plu": "", "name": 3});
        let fields = object(&fields).unwrap();
        assert_eq!(
            required_string(fields, "plu").unwrap_err().message,
            "\"plu\" is not allowed to be empty"
        );
        assert_eq!(
            required_string(fields, "name").unwrap_err().message,
            "\"name\" must be a string"
        );
        assert_eq!(
            required_string(fields, "other").unwrap_err().message,
            "\"other\" is required"
        );
        assert_eq!(optional_string(fields, "other"), Ok(None));
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = object(&json!([1, 2])).unwrap_err();
        assert_eq!(err.message, "\"value\" must be of type object");
    }
}
