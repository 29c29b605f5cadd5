//! Best-effort conversion of untyped values into declared attribute types.
//!
//! Every conversion is total over already-typed input: coercing a value that
//! already has the target type returns an equal value, so coercion can be
//! re-applied to a normalized document without error.

use serde_json::{Map, Number};

use crate::error::CoercionError;
use crate::types::AttributeType;
use crate::Value;

/// Coerce `value` into the representation of `target`.
///
/// # Errors
///
/// Returns a [`CoercionError`] when the value has no sensible conversion,
/// e.g. the string `"abc"` to [`AttributeType::Integer`].
pub fn coerce_to_value(value: &Value, target: AttributeType) -> Result<Value, CoercionError> {
    match target {
        AttributeType::Any => Ok(value.clone()),
        AttributeType::String => coerce_to_string(value).map(Value::String),
        AttributeType::Integer => coerce_to_integer(value).map(Value::from),
        AttributeType::Number => number_value(value),
        AttributeType::Boolean => coerce_to_boolean(value).map(Value::Bool),
        AttributeType::Object | AttributeType::ComplexObject => {
            object_value(value, target)
        }
        AttributeType::Array => coerce_to_array(value),
        AttributeType::Params => coerce_to_params(value),
    }
}

/// Name of the kind of a value, used in diagnostics
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Coerce a value to a string.
///
/// `null` becomes the empty string, scalars use their natural rendering and
/// arrays/objects are rendered as compact JSON.
pub fn coerce_to_string(value: &Value) -> Result<String, CoercionError> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Array(_) | Value::Object(_) => {
            serde_json::to_string(value).map_err(|e| CoercionError::InvalidJson {
                value: render(value),
                target: AttributeType::String,
                reason: e.to_string(),
            })
        }
    }
}

/// Coerce a value to a signed 64-bit integer.
///
/// Floats are truncated, booleans map to 0/1, `null` and the empty string map to 0.
pub fn coerce_to_integer(value: &Value) -> Result<i64, CoercionError> {
    match value {
        Value::Null => Ok(0),
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if n.is_u64() {
                Err(out_of_range(value, AttributeType::Integer))
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                        Ok(f.trunc() as i64)
                    }
                    _ => Err(out_of_range(value, AttributeType::Integer)),
                }
            }
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0);
            }
            trimmed
                .parse::<i64>()
                .map_err(|_| mismatch(value, AttributeType::Integer))
        }
        Value::Array(_) | Value::Object(_) => Err(mismatch(value, AttributeType::Integer)),
    }
}

/// Coerce a value to a 64-bit float.
pub fn coerce_to_number(value: &Value) -> Result<f64, CoercionError> {
    number_value(value)?
        .as_f64()
        .ok_or_else(|| out_of_range(value, AttributeType::Number))
}

/// Coerce a value to a boolean.
///
/// Strings accept the usual spellings (`1`, `t`, `true`, `0`, `f`, `false`, ...),
/// numbers are true when non-zero, `null` and the empty string are false.
pub fn coerce_to_boolean(value: &Value) -> Result<bool, CoercionError> {
    match value {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(i != 0),
            None => Ok(n.as_f64().map_or(true, |f| f != 0.0)),
        },
        Value::String(s) => match s.trim() {
            "" => Ok(false),
            "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
            "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
            _ => Err(mismatch(value, AttributeType::Boolean)),
        },
        Value::Array(_) | Value::Object(_) => Err(mismatch(value, AttributeType::Boolean)),
    }
}

/// Coerce a value to a JSON object (or `null` when unset).
pub fn coerce_to_object(value: &Value) -> Result<Value, CoercionError> {
    object_value(value, AttributeType::Object)
}

/// Coerce a value to a JSON array (or `null` when unset).
pub fn coerce_to_array(value: &Value) -> Result<Value, CoercionError> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Array(_) => Ok(value.clone()),
        Value::String(s) if s.trim().is_empty() => Ok(Value::Null),
        Value::String(s) => match parse_json(s, AttributeType::Array)? {
            parsed @ Value::Array(_) => Ok(parsed),
            _ => Err(mismatch(value, AttributeType::Array)),
        },
        _ => Err(mismatch(value, AttributeType::Array)),
    }
}

/// Coerce a value to params: an object whose values are all strings.
pub fn coerce_to_params(value: &Value) -> Result<Value, CoercionError> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Object(map) => {
            let mut params = Map::with_capacity(map.len());
            for (key, entry) in map {
                params.insert(key.clone(), Value::String(coerce_to_string(entry)?));
            }
            Ok(Value::Object(params))
        }
        Value::String(s) if s.trim().is_empty() => Ok(Value::Null),
        Value::String(s) => match parse_json(s, AttributeType::Params)? {
            parsed @ Value::Object(_) => coerce_to_params(&parsed),
            _ => Err(mismatch(value, AttributeType::Params)),
        },
        _ => Err(mismatch(value, AttributeType::Params)),
    }
}

fn number_value(value: &Value) -> Result<Value, CoercionError> {
    match value {
        Value::Null => Ok(Value::from(0)),
        Value::Bool(b) => Ok(Value::from(i64::from(*b))),
        Value::Number(_) => Ok(value.clone()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(Value::from(0));
            }
            if let Ok(i) = trimmed.parse::<i64>() {
                return Ok(Value::from(i));
            }
            let f = trimmed
                .parse::<f64>()
                .map_err(|_| mismatch(value, AttributeType::Number))?;
            Number::from_f64(f)
                .map(Value::Number)
                .ok_or_else(|| out_of_range(value, AttributeType::Number))
        }
        Value::Array(_) | Value::Object(_) => Err(mismatch(value, AttributeType::Number)),
    }
}

fn object_value(value: &Value, target: AttributeType) -> Result<Value, CoercionError> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Object(_) => Ok(value.clone()),
        Value::String(s) if s.trim().is_empty() => Ok(Value::Null),
        Value::String(s) => match parse_json(s, target)? {
            parsed @ Value::Object(_) => Ok(parsed),
            _ => Err(mismatch(value, target)),
        },
        _ => Err(mismatch(value, target)),
    }
}

fn parse_json(s: &str, target: AttributeType) -> Result<Value, CoercionError> {
    serde_json::from_str(s).map_err(|e| CoercionError::InvalidJson {
        value: s.to_string(),
        target,
        reason: e.to_string(),
    })
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn mismatch(value: &Value, target: AttributeType) -> CoercionError {
    CoercionError::Mismatch {
        value: render(value),
        found: kind_of(value),
        target,
    }
}

fn out_of_range(value: &Value, target: AttributeType) -> CoercionError {
    CoercionError::OutOfRange {
        value: render(value),
        target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_string_to_integer() {
        assert_eq!(coerce_to_value(&json!("200"), AttributeType::Integer).unwrap(), json!(200));
        assert_eq!(coerce_to_value(&json!(" -7 "), AttributeType::Integer).unwrap(), json!(-7));
        assert_eq!(coerce_to_value(&json!(""), AttributeType::Integer).unwrap(), json!(0));
    }

    #[test]
    fn test_integer_rejects_garbage() {
        let err = coerce_to_value(&json!("abc"), AttributeType::Integer).unwrap_err();
        assert_eq!(
            err,
            CoercionError::Mismatch {
                value: "abc".to_string(),
                found: "string",
                target: AttributeType::Integer,
            }
        );

        assert!(coerce_to_integer(&json!([1, 2])).is_err());
        assert!(coerce_to_integer(&json!({"a": 1})).is_err());
    }

    #[test]
    fn test_float_truncates_to_integer() {
        assert_eq!(coerce_to_integer(&json!(3.9)).unwrap(), 3);
        assert_eq!(coerce_to_integer(&json!(-3.9)).unwrap(), -3);
    }

    #[test]
    fn test_integer_out_of_range() {
        let err = coerce_to_integer(&json!(u64::MAX)).unwrap_err();
        assert!(matches!(err, CoercionError::OutOfRange { .. }));
    }

    #[test]
    fn test_float_at_two_pow_63_is_out_of_range() {
        // i64::MAX as f64 rounds up to 2^63, which does not fit
        let err = coerce_to_integer(&json!(9223372036854775808.0_f64)).unwrap_err();
        assert!(matches!(err, CoercionError::OutOfRange { .. }));

        assert_eq!(coerce_to_integer(&json!(-9223372036854775808.0_f64)).unwrap(), i64::MIN);
        assert_eq!(coerce_to_integer(&json!(9.0e15_f64)).unwrap(), 9_000_000_000_000_000);
    }

    #[test]
    fn test_boolean_spellings() {
        for truthy in ["1", "t", "T", "true", "TRUE", "True"] {
            assert!(coerce_to_boolean(&json!(truthy)).unwrap(), "{truthy}");
        }
        for falsy in ["0", "f", "F", "false", "FALSE", "False", ""] {
            assert!(!coerce_to_boolean(&json!(falsy)).unwrap(), "{falsy}");
        }
        assert!(coerce_to_boolean(&json!("maybe")).is_err());
        assert!(coerce_to_boolean(&json!(2)).unwrap());
        assert!(!coerce_to_boolean(&json!(0)).unwrap());
        assert!(!coerce_to_boolean(&Value::Null).unwrap());
    }

    #[test]
    fn test_number_keeps_integers_integral() {
        assert_eq!(coerce_to_value(&json!("42"), AttributeType::Number).unwrap(), json!(42));
        assert_eq!(coerce_to_value(&json!("1.5"), AttributeType::Number).unwrap(), json!(1.5));
        assert_eq!(coerce_to_value(&json!(1.5), AttributeType::Number).unwrap(), json!(1.5));
        assert_eq!(coerce_to_number(&json!(true)).unwrap(), 1.0);
    }

    #[test]
    fn test_number_rejects_non_finite() {
        let err = coerce_to_value(&json!("NaN"), AttributeType::Number).unwrap_err();
        assert!(matches!(err, CoercionError::OutOfRange { .. }));
    }

    #[test]
    fn test_to_string_rendering() {
        assert_eq!(coerce_to_string(&json!(30)).unwrap(), "30");
        assert_eq!(coerce_to_string(&json!(true)).unwrap(), "true");
        assert_eq!(coerce_to_string(&Value::Null).unwrap(), "");
        assert_eq!(coerce_to_string(&json!({"a": 1})).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn test_object_from_json_string() {
        let value = coerce_to_value(&json!(r#"{"id": 7}"#), AttributeType::Object).unwrap();
        assert_eq!(value, json!({"id": 7}));

        let err = coerce_to_object(&json!("[1]")).unwrap_err();
        assert!(matches!(err, CoercionError::Mismatch { .. }));

        let err = coerce_to_object(&json!("{broken")).unwrap_err();
        assert!(matches!(err, CoercionError::InvalidJson { .. }));
    }

    #[test]
    fn test_array_coercion() {
        assert_eq!(coerce_to_array(&json!("[1,2]")).unwrap(), json!([1, 2]));
        assert_eq!(coerce_to_array(&json!("")).unwrap(), Value::Null);
        assert!(coerce_to_array(&json!(5)).is_err());
    }

    #[test]
    fn test_params_stringify_values() {
        let value = coerce_to_params(&json!({"retries": 3, "verbose": true, "name": "x"})).unwrap();
        assert_eq!(value, json!({"retries": "3", "verbose": "true", "name": "x"}));

        let from_string = coerce_to_params(&json!(r#"{"a": 1}"#)).unwrap();
        assert_eq!(from_string, json!({"a": "1"}));
    }

    #[test]
    fn test_any_passes_through() {
        let value = json!({"nested": [1, "two", null]});
        assert_eq!(coerce_to_value(&value, AttributeType::Any).unwrap(), value);
    }

    #[test]
    fn test_coercion_is_idempotent() {
        let cases = vec![
            (json!("200"), AttributeType::Integer),
            (json!("2.5"), AttributeType::Number),
            (json!("true"), AttributeType::Boolean),
            (json!(12), AttributeType::String),
            (json!(r#"{"k": 1}"#), AttributeType::Params),
            (json!("[true]"), AttributeType::Array),
            (json!(r#"{"value": 1}"#), AttributeType::ComplexObject),
        ];

        for (raw, target) in cases {
            let once = coerce_to_value(&raw, target).unwrap();
            let twice = coerce_to_value(&once, target).unwrap();
            assert_eq!(once, twice, "coercing {raw} to {target} twice changed the value");
        }
    }
}
