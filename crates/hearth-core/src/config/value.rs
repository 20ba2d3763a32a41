//! Typed option values and their single-line text encoding.
//!
//! Values are written as JSON scalars/arrays so every type survives a
//! save/load cycle. Reading is more forgiving than writing: hand-edited
//! and legacy files may carry `True`/`False`, bare unquoted strings, or
//! single-quoted lists, which all decode to the closest typed value.

use serde::Serialize;
use serde_json::Value as Json;

/// A single option value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<String>),
}

impl Value {
    /// Human-readable name of the stored type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Encode for the right-hand side of a `key = value` line.
    pub fn encode(&self) -> String {
        match self {
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => encode_float(*f),
            Value::Str(s) => Json::String(s.clone()).to_string(),
            Value::List(items) => {
                Json::Array(items.iter().cloned().map(Json::String).collect()).to_string()
            }
        }
    }

    /// Decode the raw right-hand side of a `key = value` line.
    ///
    /// Never fails: text that is not a recognized literal is kept as a string.
    pub fn decode(raw: &str) -> Value {
        let text = raw.trim();
        if text.is_empty() {
            return Value::Str(String::new());
        }
        if text.eq_ignore_ascii_case("true") {
            return Value::Bool(true);
        }
        if text.eq_ignore_ascii_case("false") {
            return Value::Bool(false);
        }
        match text {
            "nan" => return Value::Float(f64::NAN),
            "inf" => return Value::Float(f64::INFINITY),
            "-inf" => return Value::Float(f64::NEG_INFINITY),
            _ => {}
        }

        if let Ok(json) = serde_json::from_str::<Json>(text) {
            return from_json(json, text);
        }

        // Lists written by older releases used python-style quoting.
        if text.starts_with('[') && text.ends_with(']') && text.contains('\'') {
            let fixed = text.replace('\\', "\\\\").replace('\'', "\"");
            if let Ok(json @ Json::Array(_)) = serde_json::from_str::<Json>(&fixed) {
                return from_json(json, text);
            }
        }

        Value::Str(text.to_string())
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encode())
    }
}

fn encode_float(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    // serde_json prints finite floats with a fraction or exponent, so they
    // never read back as ints.
    serde_json::Number::from_f64(f)
        .map(|n| n.to_string())
        .unwrap_or_else(|| format!("{f:?}"))
}

fn from_json(json: Json, text: &str) -> Value {
    match json {
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => n.as_f64().map(Value::Float).unwrap_or_else(|| Value::Str(text.to_string())),
        },
        Json::String(s) => Value::Str(s),
        Json::Array(items) => Value::List(
            items
                .into_iter()
                .map(|item| match item {
                    Json::String(s) => s,
                    other => other.to_string(),
                })
                .collect(),
        ),
        Json::Null => Value::Str(String::new()),
        Json::Object(_) => Value::Str(text.to_string()),
    }
}

/// Conversion from a stored [`Value`] into a concrete Rust type.
pub trait FromValue: Sized {
    const TYPE_NAME: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for i64 {
    const TYPE_NAME: &'static str = "int";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_int()
    }
}

impl FromValue for f64 {
    const TYPE_NAME: &'static str = "float";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_float()
    }
}

impl FromValue for String {
    const TYPE_NAME: &'static str = "string";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromValue for Vec<String> {
    const TYPE_NAME: &'static str = "list";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_list().map(<[String]>::to_vec)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Value::List(items.into_iter().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_bool_is_case_insensitive() {
        assert_eq!(Value::decode("True"), Value::Bool(true));
        assert_eq!(Value::decode("FALSE"), Value::Bool(false));
        assert_eq!(Value::decode(" true "), Value::Bool(true));
    }

    #[test]
    fn test_decode_numbers() {
        assert_eq!(Value::decode("10"), Value::Int(10));
        assert_eq!(Value::decode("-3"), Value::Int(-3));
        assert_eq!(Value::decode("2.5"), Value::Float(2.5));
    }

    #[test]
    fn test_float_with_zero_fraction_stays_float() {
        let encoded = Value::Float(5.0).encode();
        assert_eq!(Value::decode(&encoded), Value::Float(5.0));
    }

    #[test]
    fn test_non_finite_floats() {
        assert_eq!(Value::Float(f64::INFINITY).encode(), "inf");
        assert_eq!(Value::decode("-inf"), Value::Float(f64::NEG_INFINITY));
        assert!(matches!(Value::decode("nan"), Value::Float(f) if f.is_nan()));
    }

    #[test]
    fn test_bare_text_is_string() {
        assert_eq!(
            Value::decode(r"C:\Users\me\ext"),
            Value::Str(r"C:\Users\me\ext".to_string())
        );
        assert_eq!(Value::decode(""), Value::Str(String::new()));
    }

    #[test]
    fn test_quoted_bool_text_stays_string() {
        let value = Value::Str("true".to_string());
        assert_eq!(value.encode(), "\"true\"");
        assert_eq!(Value::decode(&value.encode()), value);
    }

    #[test]
    fn test_legacy_single_quoted_list() {
        assert_eq!(
            Value::decode(r"['C:\ext', 'D:\more']"),
            Value::List(vec![r"C:\ext".to_string(), r"D:\more".to_string()])
        );
    }

    #[test]
    fn test_list_with_delimiters_and_escapes() {
        let value = Value::from(vec![r#"a,"b""#, r"c\d", "e]f", ""]);
        let encoded = value.encode();
        assert!(!encoded.contains('\n'));
        assert_eq!(Value::decode(&encoded), value);
    }

    #[test]
    fn test_multiline_string_encodes_on_one_line() {
        let value = Value::from("first\nsecond");
        assert!(!value.encode().contains('\n'));
        assert_eq!(Value::decode(&value.encode()), value);
    }

    #[test]
    fn test_from_value_conversions() {
        assert_eq!(bool::from_value(&Value::Bool(true)), Some(true));
        assert_eq!(i64::from_value(&Value::Bool(true)), None);
        assert_eq!(f64::from_value(&Value::Int(3)), Some(3.0));
        assert_eq!(
            Vec::<String>::from_value(&Value::List(vec!["x".into()])),
            Some(vec!["x".to_string()])
        );
    }
}
