//! Type coercion of loaded values against their defaults.
//!
//! Values read from disk are untrusted: a hand-edited file may hold `"10"`
//! where the default is the integer `10`.  [`coerce`] converts such a value to
//! the kind of its default, or reports why it cannot.
//!
//! | default  | accepted input                                                   |
//! |----------|------------------------------------------------------------------|
//! | integer  | integer, finite float (truncated), bool, integer literal string  |
//! | float    | any number, bool, float literal string                           |
//! | bool     | bool, number (non-zero is true), `true/false/1/0/yes/no/on/off`  |
//! | string   | string, number or bool (rendered as JSON text)                   |
//! | array    | array; elements coerced against the default's first element      |
//! | null     | null only                                                        |
//! | object   | nothing (sections are merged, never coerced)                     |
//!
//! An empty default array carries no element type, so any incoming array is
//! accepted verbatim.

use serde_json::{Number, Value};
use thiserror::Error;

/// Why a value could not be converted to the type of its default.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoercionError {
    /// The value's kind has no conversion to the expected kind.
    #[error("expected {expected}, found {found}")]
    Incompatible {
        expected: &'static str,
        found: &'static str,
    },

    /// A string did not parse as the expected kind.
    #[error("invalid literal for {expected}: {literal:?}")]
    InvalidLiteral {
        expected: &'static str,
        literal: String,
    },

    /// A number does not fit the expected kind.
    #[error("{value} is out of range for {expected}")]
    OutOfRange { expected: &'static str, value: String },
}

/// Returns a short name for the kind of `value`, used in diagnostics.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Converts `value` to the kind of `reference`.
///
/// Always returns a fresh value; neither argument is modified.
///
/// # Errors
///
/// Returns [`CoercionError`] when no conversion exists.  For arrays, the first
/// failing element fails the whole value.
///
/// # Examples
///
/// ```rust
/// use pan_core::coerce;
/// use serde_json::json;
///
/// assert_eq!(coerce(&json!("10"), &json!(1)).unwrap(), json!(10));
/// assert!(coerce(&json!("abc"), &json!(1)).is_err());
/// ```
pub fn coerce(value: &Value, reference: &Value) -> Result<Value, CoercionError> {
    match reference {
        Value::Array(items) => match (value, items.first()) {
            (Value::Array(values), Some(element)) => values
                .iter()
                .map(|v| coerce(v, element))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            (Value::Array(_), None) => Ok(value.clone()),
            _ => Err(incompatible(reference, value)),
        },
        Value::Number(n) if n.is_f64() => to_float(value).map(Value::Number),
        Value::Number(_) => to_integer(value).map(Value::Number),
        Value::String(_) => to_string(value).map(Value::String),
        Value::Bool(_) => to_bool(value).map(Value::Bool),
        Value::Null if value.is_null() => Ok(Value::Null),
        Value::Null | Value::Object(_) => Err(incompatible(reference, value)),
    }
}

fn incompatible(reference: &Value, value: &Value) -> CoercionError {
    CoercionError::Incompatible {
        expected: kind_name(reference),
        found: kind_name(value),
    }
}

fn to_integer(value: &Value) -> Result<Number, CoercionError> {
    const EXPECTED: &str = "integer";
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.clone()),
        Value::Number(n) => {
            let f = n.as_f64().unwrap_or(f64::NAN);
            let truncated = f.trunc();
            if f.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
                Ok(Number::from(truncated as i64))
            } else {
                Err(CoercionError::OutOfRange {
                    expected: EXPECTED,
                    value: n.to_string(),
                })
            }
        }
        Value::Bool(b) => Ok(Number::from(i64::from(*b))),
        Value::String(s) => {
            let literal = s.trim();
            literal
                .parse::<i64>()
                .map(Number::from)
                .or_else(|_| literal.parse::<u64>().map(Number::from))
                .map_err(|_| CoercionError::InvalidLiteral {
                    expected: EXPECTED,
                    literal: s.clone(),
                })
        }
        _ => Err(CoercionError::Incompatible {
            expected: EXPECTED,
            found: kind_name(value),
        }),
    }
}

fn to_float(value: &Value) -> Result<Number, CoercionError> {
    const EXPECTED: &str = "float";
    let float = match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => Some(s.trim().parse::<f64>().map_err(|_| {
            CoercionError::InvalidLiteral {
                expected: EXPECTED,
                literal: s.clone(),
            }
        })?),
        _ => {
            return Err(CoercionError::Incompatible {
                expected: EXPECTED,
                found: kind_name(value),
            })
        }
    };
    // `from_f64` rejects NaN and infinities, which JSON cannot represent.
    float
        .and_then(Number::from_f64)
        .ok_or_else(|| CoercionError::OutOfRange {
            expected: EXPECTED,
            value: value.to_string(),
        })
}

fn to_bool(value: &Value) -> Result<bool, CoercionError> {
    const EXPECTED: &str = "bool";
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => Ok(n.as_f64().is_some_and(|f| f != 0.0)),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(CoercionError::InvalidLiteral {
                expected: EXPECTED,
                literal: s.clone(),
            }),
        },
        _ => Err(CoercionError::Incompatible {
            expected: EXPECTED,
            found: kind_name(value),
        }),
    }
}

fn to_string(value: &Value) -> Result<String, CoercionError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(_) | Value::Bool(_) => Ok(value.to_string()),
        _ => Err(CoercionError::Incompatible {
            expected: "string",
            found: kind_name(value),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ── Integers ──────────────────────────────────────────────────────────────

    #[test]
    fn test_integer_from_numeric_string() {
        assert_eq!(coerce(&json!("10"), &json!(1000)).unwrap(), json!(10));
        assert_eq!(coerce(&json!(" -3 "), &json!(1000)).unwrap(), json!(-3));
    }

    #[test]
    fn test_integer_from_non_numeric_string_fails() {
        let err = coerce(&json!("abc"), &json!(10)).unwrap_err();
        assert_eq!(
            err,
            CoercionError::InvalidLiteral {
                expected: "integer",
                literal: "abc".to_string(),
            }
        );
    }

    #[test]
    fn test_integer_from_float_literal_string_fails() {
        assert!(coerce(&json!("10.5"), &json!(10)).is_err());
    }

    #[test]
    fn test_integer_from_float_truncates() {
        assert_eq!(coerce(&json!(10.9), &json!(10)).unwrap(), json!(10));
        assert_eq!(coerce(&json!(-2.5), &json!(10)).unwrap(), json!(-2));
    }

    #[test]
    fn test_integer_from_huge_float_is_out_of_range() {
        let err = coerce(&json!(1e300), &json!(10)).unwrap_err();
        assert!(matches!(err, CoercionError::OutOfRange { .. }));
    }

    #[test]
    fn test_integer_from_bool() {
        assert_eq!(coerce(&json!(true), &json!(10)).unwrap(), json!(1));
    }

    #[test]
    fn test_integer_from_null_or_array_fails() {
        assert!(coerce(&json!(null), &json!(10)).is_err());
        assert!(coerce(&json!([1]), &json!(10)).is_err());
    }

    // ── Floats and bools ──────────────────────────────────────────────────────

    #[test]
    fn test_float_from_integer_and_string() {
        assert_eq!(coerce(&json!(2), &json!(0.5)).unwrap(), json!(2.0));
        assert_eq!(coerce(&json!("1.25"), &json!(0.5)).unwrap(), json!(1.25));
    }

    #[test]
    fn test_float_from_nan_literal_is_out_of_range() {
        assert!(coerce(&json!("NaN"), &json!(0.5)).is_err());
    }

    #[test]
    fn test_bool_from_words_and_numbers() {
        assert_eq!(coerce(&json!("Yes"), &json!(false)).unwrap(), json!(true));
        assert_eq!(coerce(&json!("off"), &json!(true)).unwrap(), json!(false));
        assert_eq!(coerce(&json!(0), &json!(true)).unwrap(), json!(false));
        assert!(coerce(&json!("maybe"), &json!(true)).is_err());
    }

    // ── Strings ───────────────────────────────────────────────────────────────

    #[test]
    fn test_string_from_number_renders_json_text() {
        assert_eq!(coerce(&json!(42), &json!("metric")).unwrap(), json!("42"));
        assert_eq!(coerce(&json!(false), &json!("metric")).unwrap(), json!("false"));
    }

    #[test]
    fn test_string_from_object_fails() {
        let err = coerce(&json!({"a": 1}), &json!("metric")).unwrap_err();
        assert_eq!(
            err,
            CoercionError::Incompatible {
                expected: "string",
                found: "object",
            }
        );
    }

    // ── Sequences ─────────────────────────────────────────────────────────────

    #[test]
    fn test_array_elements_coerced_against_first_default_element() {
        let coerced = coerce(&json!(["1", 2, 3.7]), &json!([0])).unwrap();
        assert_eq!(coerced, json!([1, 2, 3]));
    }

    #[test]
    fn test_array_with_bad_element_fails_whole_value() {
        assert!(coerce(&json!(["1", "x"]), &json!([0])).is_err());
    }

    #[test]
    fn test_array_against_empty_default_is_accepted_verbatim() {
        let value = json!(["a", 1, {"b": null}]);
        assert_eq!(coerce(&value, &json!([])).unwrap(), value);
    }

    #[test]
    fn test_nested_arrays_coerce_recursively() {
        let coerced = coerce(&json!([["1"], ["2", 3]]), &json!([[0]])).unwrap();
        assert_eq!(coerced, json!([[1], [2, 3]]));
    }

    #[test]
    fn test_scalar_against_array_default_fails() {
        assert!(coerce(&json!("abc"), &json!([])).is_err());
    }

    // ── Null and objects ──────────────────────────────────────────────────────

    #[test]
    fn test_null_default_accepts_only_null() {
        assert_eq!(coerce(&json!(null), &json!(null)).unwrap(), json!(null));
        assert!(coerce(&json!(1), &json!(null)).is_err());
    }

    #[test]
    fn test_leaf_against_object_default_fails() {
        assert!(coerce(&json!(5), &json!({})).is_err());
    }
}
