//! Typed inference for query parameters.
//!
//! Every query value is classified into exactly one [`QueryValue`] variant.
//! Candidates are tried in a fixed order and the first match wins:
//!
//! 1. base-10 `i64` (`"42"`, `"-7"`, `"+3"`)
//! 2. `f64` (`"1.5"`, `"1e3"`, `".5"`, `"inf"`, `"NaN"`; integers too large for `i64`).
//!    Finite literals outside the `f64` range, such as `"1e400"`, are not floats.
//! 3. boolean, from [`TRUE_VALUES`] / [`FALSE_VALUES`]
//! 4. the raw string, unmodified
//!
//! `"1"` and `"0"` are therefore always integers, never booleans, and the
//! empty string is always a string.
//!
//! ```rust
//! use formgate_validation::{QueryValue, infer_value};
//!
//! assert_eq!(infer_value("42"), QueryValue::Int(42));
//! assert_eq!(infer_value("1"), QueryValue::Int(1));
//! assert_eq!(infer_value("1.5"), QueryValue::Float(1.5));
//! assert_eq!(infer_value("True"), QueryValue::Bool(true));
//! assert_eq!(infer_value("yes"), QueryValue::String("yes".into()));
//! ```

use formgate_core::QueryString;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Spellings accepted as boolean `true`.
pub const TRUE_VALUES: &[&str] = &["1", "t", "T", "TRUE", "true", "True"];

/// Spellings accepted as boolean `false`.
pub const FALSE_VALUES: &[&str] = &["0", "f", "F", "FALSE", "false", "False"];

/// Inferred type of a single query parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
}

impl QueryValue {
    /// Variant name, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryValue::Int(_) => "int",
            QueryValue::Float(_) => "float",
            QueryValue::Bool(_) => "bool",
            QueryValue::String(_) => "string",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            QueryValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Floats as-is, integers widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            QueryValue::Float(f) => Some(*f),
            QueryValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            QueryValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Int(i) => write!(f, "{}", i),
            QueryValue::Float(x) => write!(f, "{}", x),
            QueryValue::Bool(b) => write!(f, "{}", b),
            QueryValue::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Int(value)
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Float(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::String(value.to_string())
    }
}

/// Parse one of the accepted boolean spellings.
pub fn parse_bool(raw: &str) -> Option<bool> {
    if TRUE_VALUES.contains(&raw) {
        Some(true)
    } else if FALSE_VALUES.contains(&raw) {
        Some(false)
    } else {
        None
    }
}

// Infinity only when spelled out; overflowing literals are out of range.
fn parse_float(raw: &str) -> Option<f64> {
    let f = raw.parse::<f64>().ok()?;
    if f.is_infinite() {
        let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
        if !["inf", "infinity"]
            .iter()
            .any(|word| unsigned.eq_ignore_ascii_case(word))
        {
            return None;
        }
    }
    Some(f)
}

/// Classify a single raw value. Never fails.
pub fn infer_value(raw: &str) -> QueryValue {
    if let Ok(i) = raw.parse::<i64>() {
        QueryValue::Int(i)
    } else if let Some(f) = parse_float(raw) {
        QueryValue::Float(f)
    } else if let Some(b) = parse_bool(raw) {
        QueryValue::Bool(b)
    } else {
        QueryValue::String(raw.to_string())
    }
}

/// Infer every key of a query from its first value.
pub fn infer_query(query: &QueryString) -> HashMap<String, QueryValue> {
    query
        .first_values()
        .map(|(key, value)| (key.to_string(), infer_value(value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers() {
        assert_eq!(infer_value("42"), QueryValue::Int(42));
        assert_eq!(infer_value("-7"), QueryValue::Int(-7));
        assert_eq!(infer_value("+3"), QueryValue::Int(3));
        assert_eq!(infer_value("007"), QueryValue::Int(7));
    }

    #[test]
    fn test_integer_beats_bool() {
        assert_eq!(infer_value("1"), QueryValue::Int(1));
        assert_eq!(infer_value("0"), QueryValue::Int(0));
    }

    #[test]
    fn test_floats() {
        assert_eq!(infer_value("1.5"), QueryValue::Float(1.5));
        assert_eq!(infer_value("1e3"), QueryValue::Float(1000.0));
        assert_eq!(infer_value(".5"), QueryValue::Float(0.5));
        assert_eq!(infer_value("-inf"), QueryValue::Float(f64::NEG_INFINITY));
        assert!(matches!(infer_value("NaN"), QueryValue::Float(f) if f.is_nan()));
    }

    #[test]
    fn test_int_overflow_falls_to_float() {
        assert_eq!(infer_value("99999999999999999999"), QueryValue::Float(1e20));
    }

    #[test]
    fn test_out_of_range_float_is_string() {
        assert_eq!(infer_value("1e400"), QueryValue::String("1e400".into()));
        assert_eq!(infer_value("-1e400"), QueryValue::String("-1e400".into()));
        assert_eq!(infer_value("+Infinity"), QueryValue::Float(f64::INFINITY));
    }

    #[test]
    fn test_bool_aliases() {
        for raw in ["t", "T", "TRUE", "true", "True"] {
            assert_eq!(infer_value(raw), QueryValue::Bool(true), "{raw}");
        }
        for raw in ["f", "F", "FALSE", "false", "False"] {
            assert_eq!(infer_value(raw), QueryValue::Bool(false), "{raw}");
        }
    }

    #[test]
    fn test_bool_is_case_sensitive() {
        assert_eq!(infer_value("tRuE"), QueryValue::String("tRuE".into()));
        assert_eq!(infer_value("yes"), QueryValue::String("yes".into()));
        assert_eq!(infer_value("on"), QueryValue::String("on".into()));
    }

    #[test]
    fn test_string_fallback() {
        assert_eq!(infer_value(""), QueryValue::String(String::new()));
        assert_eq!(infer_value(" 42"), QueryValue::String(" 42".into()));
        assert_eq!(infer_value("1_000"), QueryValue::String("1_000".into()));
        assert_eq!(infer_value("x"), QueryValue::String("x".into()));
    }

    #[test]
    fn test_infer_query_first_value_only() {
        let query = QueryString::parse("id=3&id=true&name=a&name=b");
        let typed = infer_query(&query);

        assert_eq!(typed.len(), 2);
        assert_eq!(typed["id"], QueryValue::Int(3));
        assert_eq!(typed["name"], QueryValue::String("a".into()));
    }

    #[test]
    fn test_infer_query_is_idempotent() {
        let query = QueryString::parse("age=30&active=true&ratio=1.5&tag=x&tag=y");
        assert_eq!(infer_query(&query), infer_query(&query));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(QueryValue::Int(2).as_f64(), Some(2.0));
        assert_eq!(QueryValue::Float(2.5).as_i64(), None);
        assert_eq!(QueryValue::Bool(true).as_bool(), Some(true));
        assert_eq!(QueryValue::from("x").as_str(), Some("x"));
        assert_eq!(QueryValue::String("1".into()).as_i64(), None);
    }

    #[test]
    fn test_display_and_kind() {
        assert_eq!(QueryValue::Float(1.5).to_string(), "1.5");
        assert_eq!(QueryValue::from("tag").to_string(), "tag");
        assert_eq!(QueryValue::Bool(false).kind(), "bool");
    }

    #[test]
    fn test_serializes_untagged() {
        let value = serde_json::to_value(QueryValue::Int(30)).unwrap();
        assert_eq!(value, serde_json::json!(30));
        let value = serde_json::to_value(QueryValue::from("x")).unwrap();
        assert_eq!(value, serde_json::json!("x"));
    }
}
