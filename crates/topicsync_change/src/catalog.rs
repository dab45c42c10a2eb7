//! The closed catalog of change variants.
//!
//! Decoding is a two-level lookup: the `value_type` tag selects a
//! [`Namespace`], then the `kind` tag selects a [`Variant`] within it. Two
//! value types may both expose a kind with the same name (every type has
//! `set`) without colliding, and a value type only exposes the kinds that
//! make sense for it (only `collection` has `append` and `remove`).

use crate::change::{
    Change, ItemChange, SetChange, ITEM_FIELD, OLD_VALUE_FIELD, VALUE_FIELD,
};
use crate::error::{ChangeError, ChangeResult};
use crate::id::ChangeId;
use crate::record::{ChangeRecord, ID_FIELD, KIND_FIELD, VALUE_TYPE_FIELD};
use crate::value_type::{ChangeKind, ValueType};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

type DecodeFn = fn(ValueType, ChangeRecord) -> ChangeResult<Change>;

/// A concrete change variant within a value type.
#[derive(Debug)]
pub struct Variant {
    kind: ChangeKind,
    fields: &'static [&'static str],
    decode: DecodeFn,
}

impl Variant {
    /// Returns the kind this variant decodes.
    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    /// Returns the required fields, excluding the two tags.
    pub fn fields(&self) -> &'static [&'static str] {
        self.fields
    }
}

/// The variants available for one value type.
#[derive(Debug)]
pub struct Namespace {
    value_type: ValueType,
    variants: &'static [Variant],
}

impl Namespace {
    /// Returns the value type of this namespace.
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Returns every variant in this namespace.
    pub fn variants(&self) -> &'static [Variant] {
        self.variants
    }

    /// Looks up a variant by kind tag.
    pub fn variant(&self, kind: &str) -> Option<&'static Variant> {
        self.variants.iter().find(|v| v.kind.as_str() == kind)
    }
}

const SET: Variant = Variant {
    kind: ChangeKind::Set,
    fields: &[ID_FIELD, VALUE_FIELD, OLD_VALUE_FIELD],
    decode: decode_set,
};

const APPEND: Variant = Variant {
    kind: ChangeKind::Append,
    fields: &[ID_FIELD, ITEM_FIELD],
    decode: decode_append,
};

const REMOVE: Variant = Variant {
    kind: ChangeKind::Remove,
    fields: &[ID_FIELD, ITEM_FIELD],
    decode: decode_remove,
};

const SCALAR: &[Variant] = &[SET];
const COLLECTION: &[Variant] = &[SET, APPEND, REMOVE];

static CATALOG: &[Namespace] = &[
    Namespace {
        value_type: ValueType::String,
        variants: SCALAR,
    },
    Namespace {
        value_type: ValueType::Int,
        variants: SCALAR,
    },
    Namespace {
        value_type: ValueType::Float,
        variants: SCALAR,
    },
    Namespace {
        value_type: ValueType::Bool,
        variants: SCALAR,
    },
    Namespace {
        value_type: ValueType::Collection,
        variants: COLLECTION,
    },
];

/// Returns every namespace in the catalog.
pub fn catalog() -> &'static [Namespace] {
    CATALOG
}

/// Looks up the namespace for a value type tag.
pub fn namespace(value_type: &str) -> Option<&'static Namespace> {
    CATALOG
        .iter()
        .find(|ns| ns.value_type.as_str() == value_type)
}

/// Looks up a variant by its two tags, along with the namespace holding it.
pub fn lookup(
    value_type: &str,
    kind: &str,
) -> ChangeResult<(&'static Namespace, &'static Variant)> {
    let ns = namespace(value_type)
        .ok_or_else(|| ChangeError::protocol(format!("unknown value_type '{value_type}'")))?;
    let variant = ns.variant(kind).ok_or_else(|| {
        ChangeError::protocol(format!(
            "unknown kind '{kind}' for value_type '{value_type}'"
        ))
    })?;
    Ok((ns, variant))
}

/// Decodes a wire record into a change.
///
/// Fails with a protocol error on an unknown tag, a missing or unexpected
/// field, or a field whose value does not fit the value type.
pub fn decode(mut record: ChangeRecord) -> ChangeResult<Change> {
    let value_type = record.take_tag(VALUE_TYPE_FIELD)?;
    let kind = record.take_tag(KIND_FIELD)?;
    let (ns, variant) = lookup(&value_type, &kind)?;

    // serde would quietly turn an absent `Value` field into null
    if let Some(missing) = variant.fields.iter().find(|f| record.get(f).is_none()) {
        return Err(ChangeError::protocol(format!(
            "missing field '{missing}' in {value_type}/{kind} record"
        )));
    }

    (variant.decode)(ns.value_type, record)
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SetFields {
    id: ChangeId,
    value: Value,
    old_value: Value,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ItemFields {
    id: ChangeId,
    item: Value,
}

fn fields<T: DeserializeOwned>(record: ChangeRecord) -> ChangeResult<T> {
    serde_json::from_value(record.into_value())
        .map_err(|e| ChangeError::protocol(format!("malformed change record: {e}")))
}

fn decode_set(value_type: ValueType, record: ChangeRecord) -> ChangeResult<Change> {
    let SetFields {
        id,
        value,
        old_value,
    } = fields(record)?;

    if !value_type.accepts(&value) {
        return Err(ChangeError::protocol(format!(
            "value {value} is not a valid {value_type}"
        )));
    }
    let old_value = match old_value {
        Value::Null => None,
        v if value_type.accepts(&v) => Some(v),
        v => {
            return Err(ChangeError::protocol(format!(
                "old_value {v} is not a valid {value_type}"
            )))
        }
    };

    Ok(Change::Set(SetChange {
        id,
        value_type,
        value,
        old_value,
    }))
}

fn decode_append(_: ValueType, record: ChangeRecord) -> ChangeResult<Change> {
    let ItemFields { id, item } = fields(record)?;
    Ok(Change::Append(ItemChange { id, item }))
}

fn decode_remove(_: ValueType, record: ChangeRecord) -> ChangeResult<Change> {
    let ItemFields { id, item } = fields(record)?;
    Ok(Change::Remove(ItemChange { id, item }))
}
