//! Row keys and the record abstraction.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unique identifier of a data row across renders, measurements and expansion state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "KeyRepr", into = "String")]
pub struct RowKey(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum KeyRepr {
    Text(String),
    Int(i64),
    Float(f64),
}

impl From<KeyRepr> for RowKey {
    fn from(repr: KeyRepr) -> Self {
        match repr {
            KeyRepr::Text(s) => RowKey(s),
            KeyRepr::Int(i) => RowKey(i.to_string()),
            KeyRepr::Float(f) => RowKey(f.to_string()),
        }
    }
}

impl RowKey {
    pub fn new(key: impl Into<String>) -> Self {
        RowKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<RowKey> for String {
    fn from(key: RowKey) -> Self {
        key.0
    }
}

impl From<&str> for RowKey {
    fn from(s: &str) -> Self {
        RowKey(s.to_string())
    }
}

impl From<String> for RowKey {
    fn from(s: String) -> Self {
        RowKey(s)
    }
}

impl From<u64> for RowKey {
    fn from(n: u64) -> Self {
        RowKey(n.to_string())
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A row record the table can key and descend into.
pub trait Record {
    /// Value of `field` usable as a row key.
    fn key_field(&self, field: &str) -> Option<RowKey>;

    /// Nested child records stored under `field`.
    fn children(&self, field: &str) -> Option<&[Self]>
    where
        Self: Sized;
}

impl Record for Value {
    fn key_field(&self, field: &str) -> Option<RowKey> {
        match self.get(field)? {
            Value::String(s) => Some(RowKey(s.clone())),
            Value::Number(n) => Some(RowKey(n.to_string())),
            Value::Bool(b) => Some(RowKey(b.to_string())),
            _ => None,
        }
    }

    fn children(&self, field: &str) -> Option<&[Self]> {
        self.get(field)?.as_array().map(Vec::as_slice)
    }
}

/// Follow a data path into a JSON record. Numeric segments index arrays.
pub fn path_value<'a>(record: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter().try_fold(record, |current, segment| match current {
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        Value::Object(map) => map.get(segment),
        _ => None,
    })
}

/// How a row key is derived: a field name, or a function of (record, index).
pub enum RowKeySource<R> {
    Field(String),
    Derive(Rc<dyn Fn(&R, usize) -> Option<RowKey>>),
}

impl<R: Record> RowKeySource<R> {
    pub fn key_of(&self, record: &R, index: usize) -> Option<RowKey> {
        match self {
            RowKeySource::Field(field) => record.key_field(field),
            RowKeySource::Derive(f) => f(record, index),
        }
    }

    /// Field name used in warnings.
    pub fn describe(&self) -> &str {
        match self {
            RowKeySource::Field(field) => field,
            RowKeySource::Derive(_) => "rowKey()",
        }
    }
}

impl<R> Clone for RowKeySource<R> {
    fn clone(&self) -> Self {
        match self {
            RowKeySource::Field(field) => RowKeySource::Field(field.clone()),
            RowKeySource::Derive(f) => RowKeySource::Derive(Rc::clone(f)),
        }
    }
}

impl<R> fmt::Debug for RowKeySource<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKeySource::Field(field) => f.debug_tuple("Field").field(field).finish(),
            RowKeySource::Derive(_) => f.write_str("Derive(..)"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_field_accepts_numbers_and_strings() {
        let rec = json!({"key": 7, "id": "x"});
        assert_eq!(rec.key_field("key"), Some(RowKey::from("7")));
        assert_eq!(rec.key_field("id"), Some(RowKey::from("x")));
        assert_eq!(rec.key_field("missing"), None);
    }

    #[test]
    fn test_row_key_deserializes_from_number() {
        let keys: Vec<RowKey> = serde_json::from_str(r#"["a", 2]"#).unwrap();
        assert_eq!(keys, vec![RowKey::from("a"), RowKey::from("2")]);
    }

    #[test]
    fn test_path_value() {
        let rec = json!({"a": {"b": [10, 20]}});
        let path = vec!["a".to_string(), "b".to_string(), "1".to_string()];
        assert_eq!(path_value(&rec, &path), Some(&json!(20)));
        assert_eq!(path_value(&rec, &["z".to_string()]), None);
    }

    #[test]
    fn test_derive_key_source() {
        let source: RowKeySource<Value> =
            RowKeySource::Derive(Rc::new(|_, index| Some(RowKey::new(format!("row-{index}")))));
        assert_eq!(source.key_of(&json!({}), 3), Some(RowKey::from("row-3")));
    }
}
