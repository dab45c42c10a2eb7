//! Value types and change kinds.

use serde_json::Value;
use std::fmt;

/// The semantic type of a topic's value.
///
/// The value type decides which change kinds are valid and is the first
/// key of the catalog lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// UTF-8 text.
    String,
    /// Signed integer.
    Int,
    /// Floating point number.
    Float,
    /// Boolean flag.
    Bool,
    /// Unordered collection of JSON items.
    Collection,
}

impl ValueType {
    /// Every value type, in catalog order.
    pub const ALL: [ValueType; 5] = [
        ValueType::String,
        ValueType::Int,
        ValueType::Float,
        ValueType::Bool,
        ValueType::Collection,
    ];

    /// Returns the wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Bool => "bool",
            ValueType::Collection => "collection",
        }
    }

    /// Parses a wire tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "string" => Some(ValueType::String),
            "int" => Some(ValueType::Int),
            "float" => Some(ValueType::Float),
            "bool" => Some(ValueType::Bool),
            "collection" => Some(ValueType::Collection),
            _ => None,
        }
    }

    /// Returns the value a fresh topic of this type starts with.
    pub fn default_value(&self) -> Value {
        match self {
            ValueType::String => Value::String(String::new()),
            ValueType::Int => Value::from(0),
            ValueType::Float => Value::from(0.0),
            ValueType::Bool => Value::Bool(false),
            ValueType::Collection => Value::Array(Vec::new()),
        }
    }

    /// Returns true if `value` is a valid value of this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ValueType::String => value.is_string(),
            ValueType::Int => value.is_i64() || value.is_u64(),
            ValueType::Float => value.is_number(),
            ValueType::Bool => value.is_boolean(),
            ValueType::Collection => value.is_array(),
        }
    }

    /// Compares two values of this type.
    ///
    /// Collections compare as multisets: element order is ignored, element
    /// multiplicity is not. Every other type compares structurally.
    pub fn values_equal(&self, a: &Value, b: &Value) -> bool {
        match (self, a, b) {
            (ValueType::Collection, Value::Array(a), Value::Array(b)) => same_members(a, b),
            _ => a == b,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn same_members(a: &[Value], b: &[Value]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut unmatched: Vec<&Value> = b.iter().collect();
    for item in a {
        match unmatched.iter().position(|candidate| *candidate == item) {
            Some(pos) => {
                unmatched.swap_remove(pos);
            }
            None => return false,
        }
    }
    true
}

/// The shape of an operation within a value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Full replacement of the value.
    Set,
    /// Add one item to a collection.
    Append,
    /// Remove one occurrence of an item from a collection.
    Remove,
}

impl ChangeKind {
    /// Returns the wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Set => "set",
            ChangeKind::Append => "append",
            ChangeKind::Remove => "remove",
        }
    }

    /// Parses a wire tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "set" => Some(ChangeKind::Set),
            "append" => Some(ChangeKind::Append),
            "remove" => Some(ChangeKind::Remove),
            _ => None,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_type_tags() {
        for value_type in ValueType::ALL {
            assert_eq!(ValueType::from_tag(value_type.as_str()), Some(value_type));
        }
        assert_eq!(ValueType::from_tag("set"), None);
        assert_eq!(ValueType::from_tag("String"), None);
    }

    #[test]
    fn kind_tags() {
        assert_eq!(ChangeKind::from_tag("set"), Some(ChangeKind::Set));
        assert_eq!(ChangeKind::from_tag("append"), Some(ChangeKind::Append));
        assert_eq!(ChangeKind::from_tag("remove"), Some(ChangeKind::Remove));
        assert_eq!(ChangeKind::from_tag("insert"), None);
    }

    #[test]
    fn defaults_are_accepted() {
        for value_type in ValueType::ALL {
            assert!(value_type.accepts(&value_type.default_value()));
            assert!(!value_type.accepts(&Value::Null));
        }
    }

    #[test]
    fn acceptance() {
        assert!(ValueType::Int.accepts(&json!(-3)));
        assert!(!ValueType::Int.accepts(&json!(1.5)));
        assert!(ValueType::Float.accepts(&json!(1.5)));
        assert!(ValueType::Float.accepts(&json!(2)));
        assert!(!ValueType::String.accepts(&json!(["a"])));
        assert!(ValueType::Collection.accepts(&json!(["a", 1])));
    }

    #[test]
    fn collection_equality_ignores_order() {
        let t = ValueType::Collection;
        assert!(t.values_equal(&json!(["a", "b"]), &json!(["b", "a"])));
        assert!(!t.values_equal(&json!(["a", "a"]), &json!(["a", "b"])));
        assert!(!t.values_equal(&json!(["a"]), &json!(["a", "a"])));
        assert!(!ValueType::String.values_equal(&json!("a"), &json!("b")));
    }
}
