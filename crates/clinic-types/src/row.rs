//! Tolerant access to a backend row.
//!
//! Records decode through [`Row`] rather than field-by-field serde rules. A row is kept whenever
//! it is a JSON object: a field with an unexpected type reads as absent instead of failing the
//! whole record, so only the identity decides whether a store keeps it.

use crate::id::coerce_id;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// A raw JSON object as sent by the backend.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row(Map<String, Value>);

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Map::deserialize(deserializer).map(Row)
    }
}

impl From<Map<String, Value>> for Row {
    fn from(map: Map<String, Value>) -> Self {
        Row(map)
    }
}

impl Row {
    fn present(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|value| !value.is_null())
    }

    /// The identity held by the first of `keys` that is present and not null.
    ///
    /// Later keys are only consulted when earlier ones are missing, so `{"doctorID": 1, "id": 9}`
    /// read with `["doctorID", "id", "ID"]` is `1`. A present but non-numeric value is `None`.
    pub fn id(&self, keys: &[&str]) -> Option<i64> {
        keys.iter()
            .find_map(|key| self.present(key))
            .and_then(coerce_id)
    }

    /// Text value; numbers and booleans are rendered, anything else is absent.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.present(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Numeric value; numeric strings such as `"40.00"` are accepted.
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.present(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            _ => None,
        }
    }
}
