//! Invertible changes.

use crate::catalog;
use crate::error::{ChangeError, ChangeResult};
use crate::id::ChangeId;
use crate::record::{ChangeRecord, ID_FIELD, KIND_FIELD, VALUE_TYPE_FIELD};
use crate::value_type::{ChangeKind, ValueType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field holding the replacement value of a `set` change.
pub const VALUE_FIELD: &str = "value";
/// Field holding the captured pre-image of a `set` change.
pub const OLD_VALUE_FIELD: &str = "old_value";
/// Field holding the item of an `append` or `remove` change.
pub const ITEM_FIELD: &str = "item";

/// Full replacement of a topic's value.
#[derive(Debug, Clone, PartialEq)]
pub struct SetChange {
    /// Change identity.
    pub id: ChangeId,
    /// Type of the replaced value.
    pub value_type: ValueType,
    /// The replacement value.
    pub value: Value,
    /// The value observed by the last `apply`, if any.
    pub old_value: Option<Value>,
}

/// Addition or removal of a single collection item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemChange {
    /// Change identity.
    pub id: ChangeId,
    /// The item.
    pub item: Value,
}

/// A self-describing, serializable, invertible operation over a topic value.
///
/// # Invariants
///
/// - For a `set` change `c` and any value `v`, once `c.apply(&v)` has run,
///   applying `c.inverse()` to the result yields `v` again.
/// - `append(x)` and `remove(x)` are each other's inverse without any prior
///   `apply`.
/// - A failed `apply` never produces a value; the caller's value stays as it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ChangeRecord", into = "ChangeRecord")]
pub enum Change {
    /// Replace the whole value.
    Set(SetChange),
    /// Append an item to a collection.
    Append(ItemChange),
    /// Remove the first occurrence of an item from a collection.
    Remove(ItemChange),
}

impl Change {
    /// Creates a full-replace change.
    pub fn set(value_type: ValueType, value: impl Into<Value>) -> Self {
        Change::Set(SetChange {
            id: ChangeId::new(),
            value_type,
            value: value.into(),
            old_value: None,
        })
    }

    /// Creates a full-replace change for a string topic.
    pub fn set_string(value: impl Into<String>) -> Self {
        Self::set(ValueType::String, Value::String(value.into()))
    }

    /// Creates a collection append.
    pub fn append(item: impl Into<Value>) -> Self {
        Change::Append(ItemChange {
            id: ChangeId::new(),
            item: item.into(),
        })
    }

    /// Creates a collection remove.
    pub fn remove(item: impl Into<Value>) -> Self {
        Change::Remove(ItemChange {
            id: ChangeId::new(),
            item: item.into(),
        })
    }

    /// Replaces the identity.
    #[must_use]
    pub fn with_id(mut self, id: ChangeId) -> Self {
        match &mut self {
            Change::Set(change) => change.id = id,
            Change::Append(change) | Change::Remove(change) => change.id = id,
        }
        self
    }

    /// Returns the identity.
    pub fn id(&self) -> ChangeId {
        match self {
            Change::Set(change) => change.id,
            Change::Append(change) | Change::Remove(change) => change.id,
        }
    }

    /// Returns the value type this change operates on.
    pub fn value_type(&self) -> ValueType {
        match self {
            Change::Set(change) => change.value_type,
            Change::Append(_) | Change::Remove(_) => ValueType::Collection,
        }
    }

    /// Returns the change kind.
    pub fn kind(&self) -> ChangeKind {
        match self {
            Change::Set(_) => ChangeKind::Set,
            Change::Append(_) => ChangeKind::Append,
            Change::Remove(_) => ChangeKind::Remove,
        }
    }

    /// Returns the captured pre-image of a `set` change.
    pub fn preimage(&self) -> Option<&Value> {
        match self {
            Change::Set(change) => change.old_value.as_ref(),
            Change::Append(_) | Change::Remove(_) => None,
        }
    }

    /// Returns true if [`inverse`](Self::inverse) will succeed.
    pub fn is_invertible(&self) -> bool {
        match self {
            Change::Set(change) => change.old_value.is_some(),
            Change::Append(_) | Change::Remove(_) => true,
        }
    }

    /// Computes the value that results from applying this change to `old_value`.
    ///
    /// A `set` change captures `old_value` as its pre-image, which is what
    /// makes it invertible. On error nothing is captured.
    pub fn apply(&mut self, old_value: &Value) -> ChangeResult<Value> {
        match self {
            Change::Set(change) => {
                if !change.value_type.accepts(&change.value) {
                    let reason = format!(
                        "{} is not a valid {} value",
                        change.value, change.value_type
                    );
                    return Err(ChangeError::validation(self.to_record(), reason));
                }
                change.old_value = Some(old_value.clone());
                Ok(change.value.clone())
            }
            Change::Append(change) => {
                let Some(items) = old_value.as_array() else {
                    return Err(self.not_a_collection(old_value));
                };
                let mut items = items.clone();
                items.push(change.item.clone());
                Ok(Value::Array(items))
            }
            Change::Remove(change) => {
                let Some(items) = old_value.as_array() else {
                    return Err(self.not_a_collection(old_value));
                };
                let Some(pos) = items.iter().position(|item| *item == change.item) else {
                    let reason = format!("cannot remove {} from {}", change.item, old_value);
                    return Err(ChangeError::validation(self.to_record(), reason));
                };
                let mut items = items.clone();
                items.remove(pos);
                Ok(Value::Array(items))
            }
        }
    }

    fn not_a_collection(&self, value: &Value) -> ChangeError {
        ChangeError::validation(
            self.to_record(),
            format!("{value} is not a collection"),
        )
    }

    /// Returns the change that undoes this one.
    ///
    /// The inverse always carries a fresh identity. For a `set` change the
    /// inverse replaces the value with the captured pre-image and records the
    /// current replacement as its own pre-image; it fails with
    /// [`ChangeError::InverseUnavailable`] until the change has been applied.
    pub fn inverse(&self) -> ChangeResult<Change> {
        match self {
            Change::Set(change) => {
                let old_value = change
                    .old_value
                    .clone()
                    .ok_or(ChangeError::InverseUnavailable { id: change.id })?;
                Ok(Change::Set(SetChange {
                    id: ChangeId::new(),
                    value_type: change.value_type,
                    value: old_value,
                    old_value: Some(change.value.clone()),
                }))
            }
            Change::Append(change) => Ok(Change::remove(change.item.clone())),
            Change::Remove(change) => Ok(Change::append(change.item.clone())),
        }
    }

    /// Converts to the wire record.
    pub fn to_record(&self) -> ChangeRecord {
        let record = ChangeRecord::new()
            .with(VALUE_TYPE_FIELD, self.value_type().as_str())
            .with(KIND_FIELD, self.kind().as_str())
            .with(ID_FIELD, self.id().to_string());

        match self {
            Change::Set(change) => record
                .with(VALUE_FIELD, change.value.clone())
                .with(OLD_VALUE_FIELD, change.old_value.clone().unwrap_or(Value::Null)),
            Change::Append(change) | Change::Remove(change) => {
                record.with(ITEM_FIELD, change.item.clone())
            }
        }
    }

    /// Decodes a wire record through the catalog.
    pub fn from_record(record: ChangeRecord) -> ChangeResult<Change> {
        catalog::decode(record)
    }
}

impl From<Change> for ChangeRecord {
    fn from(change: Change) -> Self {
        change.to_record()
    }
}

impl TryFrom<ChangeRecord> for Change {
    type Error = ChangeError;

    fn try_from(record: ChangeRecord) -> ChangeResult<Self> {
        Change::from_record(record)
    }
}
