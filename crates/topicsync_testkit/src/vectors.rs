//! Wire test vectors for change records.
//!
//! These vectors pin the JSON record format so peers written against the
//! same wire format decode identically.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const ID: &str = "6f1c2a9e-3b4d-4e5f-8a7b-1c2d3e4f5a6b";

/// A wire record with its expected decoding outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// The record as it appears on the wire.
    pub record: Value,
    /// Substring of the expected error message, if decoding must fail.
    pub expected_error: Option<String>,
}

fn ok(id: &str, description: &str, record: Value) -> WireVector {
    WireVector {
        id: id.into(),
        description: description.into(),
        record,
        expected_error: None,
    }
}

fn err(id: &str, description: &str, record: Value, expected_error: &str) -> WireVector {
    WireVector {
        id: id.into(),
        description: description.into(),
        record,
        expected_error: Some(expected_error.into()),
    }
}

/// Records that must decode.
pub fn valid_change_vectors() -> Vec<WireVector> {
    vec![
        ok(
            "string_set",
            "string full replace with captured pre-image",
            json!({"value_type": "string", "kind": "set", "id": ID, "value": "hello", "old_value": ""}),
        ),
        ok(
            "string_set_unapplied",
            "string full replace before apply",
            json!({"value_type": "string", "kind": "set", "id": ID, "value": "hello", "old_value": null}),
        ),
        ok(
            "int_set",
            "int full replace",
            json!({"value_type": "int", "kind": "set", "id": ID, "value": 9, "old_value": 5}),
        ),
        ok(
            "float_set",
            "float full replace",
            json!({"value_type": "float", "kind": "set", "id": ID, "value": 0.5, "old_value": 0.0}),
        ),
        ok(
            "bool_set",
            "bool full replace",
            json!({"value_type": "bool", "kind": "set", "id": ID, "value": true, "old_value": false}),
        ),
        ok(
            "collection_set",
            "collection full replace",
            json!({"value_type": "collection", "kind": "set", "id": ID, "value": ["a"], "old_value": []}),
        ),
        ok(
            "collection_append",
            "collection append of an object item",
            json!({"value_type": "collection", "kind": "append", "id": ID, "item": {"user": "ann"}}),
        ),
        ok(
            "collection_remove",
            "collection remove",
            json!({"value_type": "collection", "kind": "remove", "id": ID, "item": "a"}),
        ),
    ]
}

/// Records that must be rejected as protocol errors.
pub fn invalid_change_vectors() -> Vec<WireVector> {
    vec![
        err(
            "unknown_value_type",
            "value type outside the catalog",
            json!({"value_type": "set", "kind": "append", "id": ID, "item": "a"}),
            "unknown value_type 'set'",
        ),
        err(
            "unknown_kind",
            "kind not exposed by the value type",
            json!({"value_type": "int", "kind": "append", "id": ID, "item": 1}),
            "unknown kind 'append' for value_type 'int'",
        ),
        err(
            "missing_value_type",
            "record without a value type tag",
            json!({"kind": "set", "id": ID, "value": "a", "old_value": null}),
            "missing field 'value_type'",
        ),
        err(
            "missing_old_value",
            "full replace without old_value",
            json!({"value_type": "string", "kind": "set", "id": ID, "value": "a"}),
            "missing field 'old_value'",
        ),
        err(
            "missing_id",
            "append without identity",
            json!({"value_type": "collection", "kind": "append", "item": "a"}),
            "missing field 'id'",
        ),
        err(
            "extra_field",
            "remove with an unexpected field",
            json!({"value_type": "collection", "kind": "remove", "id": ID, "item": "a", "index": 2}),
            "malformed change record",
        ),
        err(
            "bad_id",
            "identity that is not a UUID",
            json!({"value_type": "collection", "kind": "remove", "id": "42", "item": "a"}),
            "malformed change record",
        ),
        err(
            "mistyped_value",
            "string replace with a numeric value",
            json!({"value_type": "string", "kind": "set", "id": ID, "value": 3, "old_value": null}),
            "is not a valid string",
        ),
        err(
            "not_an_object",
            "record that is not a JSON object",
            json!(["string", "set"]),
            "expected object",
        ),
    ]
}
