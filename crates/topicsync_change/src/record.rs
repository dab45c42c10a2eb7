//! Wire records for changes.

use crate::error::{ChangeError, ChangeResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Field holding the value type tag.
pub const VALUE_TYPE_FIELD: &str = "value_type";
/// Field holding the kind tag.
pub const KIND_FIELD: &str = "kind";
/// Field holding the change identity.
pub const ID_FIELD: &str = "id";

/// The serializable form of a [`Change`](crate::Change).
///
/// A record is a JSON object with string keys: the `value_type` and `kind`
/// tags, the `id`, and the kind-specific fields. Keys are kept sorted, so
/// equal records serialize to identical text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeRecord(Map<String, Value>);

impl ChangeRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Creates a record from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> ChangeResult<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ChangeError::protocol(format!(
                "expected object for change record, got {other}"
            ))),
        }
    }

    /// Parses a record from JSON text.
    pub fn from_json(text: &str) -> ChangeResult<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| ChangeError::protocol(format!("invalid JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Sets a field, returning the record for chaining.
    #[must_use]
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    /// Returns a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Returns the `value_type` tag, if present and textual.
    pub fn value_type_tag(&self) -> Option<&str> {
        self.get(VALUE_TYPE_FIELD).and_then(Value::as_str)
    }

    /// Returns the `kind` tag, if present and textual.
    pub fn kind_tag(&self) -> Option<&str> {
        self.get(KIND_FIELD).and_then(Value::as_str)
    }

    /// Removes a string tag field, failing if it is missing or not a string.
    pub(crate) fn take_tag(&mut self, field: &str) -> ChangeResult<String> {
        match self.0.remove(field) {
            Some(Value::String(tag)) => Ok(tag),
            Some(other) => Err(ChangeError::protocol(format!(
                "field '{field}' must be a string, got {other}"
            ))),
            None => Err(ChangeError::protocol(format!("missing field '{field}'"))),
        }
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Converts into a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Converts into the underlying map.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for ChangeRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<ChangeRecord> for Value {
    fn from(record: ChangeRecord) -> Self {
        record.into_value()
    }
}

impl fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
