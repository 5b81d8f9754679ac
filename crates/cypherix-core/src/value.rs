//! Typed search values bound into Cypher statements.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A typed search value.
///
/// Serialized untagged, so plain JSON scalars and arrays map directly onto
/// the matching variant. Dates use the `{"$date": "<rfc3339>"}` form so they
/// are never confused with strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Date(#[serde(with = "tagged_date")] DateTime<Utc>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The value as it is stored in the graph.
    ///
    /// Dates are persisted as epoch milliseconds; every other variant is
    /// stored unchanged.
    pub fn read_value(&self) -> Value {
        match self {
            Value::Date(at) => Value::Integer(at.timestamp_millis()),
            Value::List(items) => Value::List(items.iter().map(Value::read_value).collect()),
            other => other.clone(),
        }
    }

    /// Lower-cased string form, used by the case-insensitive comparisons.
    pub fn to_lowercase(&self) -> Value {
        Value::String(self.to_string().to_lowercase())
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Boolean(b) => b.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::String(s) => s.hash(state),
            Value::List(items) => items.hash(state),
            Value::Date(at) => at.timestamp_millis().hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Date(at) => write!(f, "{}", at.to_rfc3339()),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(at: DateTime<Utc>) -> Self {
        Value::Date(at)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

mod tagged_date {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Tagged {
        #[serde(rename = "$date")]
        date: DateTime<Utc>,
    }

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        Tagged { date: *date }.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        Tagged::deserialize(deserializer).map(|t| t.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_untagged_json() {
        let values: Vec<Value> = serde_json::from_str(r#"[null, true, 30, 2.5, "x", [1, "a"]]"#).unwrap();
        assert_eq!(values[0], Value::Null);
        assert_eq!(values[1], Value::Boolean(true));
        assert_eq!(values[2], Value::Integer(30));
        assert_eq!(values[3], Value::Float(2.5));
        assert_eq!(values[4], Value::from("x"));
        assert_eq!(values[5], Value::List(vec![Value::Integer(1), Value::from("a")]));
    }

    #[test]
    fn test_tagged_date() {
        let value: Value = serde_json::from_str(r#"{"$date": "2024-03-01T00:00:00Z"}"#).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(value, Value::Date(expected));
        assert_eq!(value.read_value(), Value::Integer(expected.timestamp_millis()));
    }

    #[test]
    fn test_rfc3339_string_stays_string() {
        let value: Value = serde_json::from_str(r#""2024-03-01T00:00:00Z""#).unwrap();
        assert!(matches!(value, Value::String(_)));
    }

    #[test]
    fn test_lowercase() {
        assert_eq!(Value::from("MiXeD").to_lowercase(), Value::from("mixed"));
        assert_eq!(Value::Integer(7).to_lowercase(), Value::from("7"));
    }
}
