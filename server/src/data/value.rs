//! Scalar values and ordered records
//!
//! `Scalar` is the only value type that crosses the query layer. Filter
//! conditions, write payloads and decoded result rows all carry it, so the
//! compiler and executor can bind values positionally without inspecting
//! Rust types.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single bindable value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::Bool(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    /// SQLite has no boolean storage class, so 0/1 integers read as booleans.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            Self::Integer(0) => Some(false),
            Self::Integer(1) => Some(true),
            _ => None,
        }
    }

    /// Kind name used in decode errors and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<u32> for Scalar {
    fn from(v: u32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<&String> for Scalar {
    fn from(v: &String) -> Self {
        Self::Text(v.clone())
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Row decoding failure
#[derive(Error, Debug, PartialEq)]
pub enum DecodeError {
    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Column {column}: expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Insertion-ordered field/value map
///
/// Used both as a write payload (field order drives placeholder order) and
/// as a decoded result row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    #[serde(serialize_with = "serialize_fields")]
    fields: Vec<(String, Scalar)>,
}

fn serialize_fields<S>(fields: &[(String, Scalar)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeMap;

    let mut map = serializer.serialize_map(Some(fields.len()))?;
    for (name, value) in fields {
        map.serialize_entry(name, value)?;
    }
    map.end()
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, chaining. Replaces an existing field in place.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.set(field, value);
        self
    }

    /// Set a field. An existing field keeps its position.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Scalar>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Scalar> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Scalar> {
        self.fields.iter().map(|(_, value)| value)
    }

    fn require(&self, field: &str) -> Result<&Scalar, DecodeError> {
        self.get(field)
            .ok_or_else(|| DecodeError::MissingColumn(field.to_string()))
    }

    pub fn require_i64(&self, field: &str) -> Result<i64, DecodeError> {
        let value = self.require(field)?;
        value.as_i64().ok_or_else(|| mismatch(field, "integer", value))
    }

    pub fn require_bool(&self, field: &str) -> Result<bool, DecodeError> {
        let value = self.require(field)?;
        value.as_bool().ok_or_else(|| mismatch(field, "boolean", value))
    }

    pub fn require_str(&self, field: &str) -> Result<String, DecodeError> {
        let value = self.require(field)?;
        value
            .as_str()
            .map(String::from)
            .ok_or_else(|| mismatch(field, "text", value))
    }

    /// Text column that may be NULL
    pub fn optional_str(&self, field: &str) -> Result<Option<String>, DecodeError> {
        match self.require(field)? {
            Scalar::Null => Ok(None),
            Scalar::Text(v) => Ok(Some(v.clone())),
            other => Err(mismatch(field, "text", other)),
        }
    }
}

fn mismatch(field: &str, expected: &'static str, found: &Scalar) -> DecodeError {
    DecodeError::TypeMismatch {
        column: field.to_string(),
        expected,
        found: found.kind(),
    }
}

impl<K: Into<String>, V: Into<Scalar>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (field, value) in iter {
            record.set(field, value);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_deserializes_from_json_kinds() {
        let values: Vec<Scalar> = serde_json::from_str(r#"[null, true, 7, 1.5, "x"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Scalar::Null,
                Scalar::Bool(true),
                Scalar::Integer(7),
                Scalar::Float(1.5),
                Scalar::Text("x".to_string()),
            ]
        );
    }

    #[test]
    fn sqlite_integers_read_as_bool() {
        assert_eq!(Scalar::Integer(1).as_bool(), Some(true));
        assert_eq!(Scalar::Integer(0).as_bool(), Some(false));
        assert_eq!(Scalar::Integer(2).as_bool(), None);
    }

    #[test]
    fn option_converts_to_null() {
        let none: Option<&str> = None;
        assert_eq!(Scalar::from(none), Scalar::Null);
        assert_eq!(Scalar::from(Some(5i64)), Scalar::Integer(5));
    }

    #[test]
    fn record_set_keeps_position() {
        let mut record = Record::new().with("a", 1).with("b", 2);
        record.set("a", 10);
        record.set("c", 3);

        let names: Vec<&str> = record.field_names().collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(record.get("a"), Some(&Scalar::Integer(10)));
    }

    #[test]
    fn record_serializes_as_object_in_order() {
        let record = Record::new().with("z", "last").with("a", Scalar::Null);
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"z":"last","a":null}"#
        );
    }

    #[test]
    fn record_decode_helpers() {
        let record = Record::new()
            .with("id", 3)
            .with("title", "x")
            .with("description", Scalar::Null)
            .with("completed", 1);

        assert_eq!(record.require_i64("id"), Ok(3));
        assert_eq!(record.require_str("title"), Ok("x".to_string()));
        assert_eq!(record.optional_str("description"), Ok(None));
        assert_eq!(record.require_bool("completed"), Ok(true));
        assert_eq!(
            record.require_i64("missing"),
            Err(DecodeError::MissingColumn("missing".to_string()))
        );
        assert_eq!(
            record.require_i64("title"),
            Err(DecodeError::TypeMismatch {
                column: "title".to_string(),
                expected: "integer",
                found: "text",
            })
        );
    }
}
