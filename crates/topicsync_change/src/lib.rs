//! # topicsync Change
//!
//! Invertible, self-describing changes to topic values.
//!
//! This crate provides:
//! - `Change` with `apply`, `inverse` and wire-record conversion
//! - `ChangeRecord`, the JSON wire form of a change
//! - The two-level (`value_type`, `kind`) variant catalog used for decoding
//! - `ChangeError` for validation and protocol failures
//!
//! This is a pure crate with no I/O operations.
//!
//! ## Usage
//!
//! ```
//! use serde_json::json;
//! use topicsync_change::{Change, ChangeRecord};
//!
//! let mut change = Change::append("b");
//! let value = change.apply(&json!(["a"])).unwrap();
//! assert_eq!(value, json!(["a", "b"]));
//!
//! let record: ChangeRecord = change.to_record();
//! let decoded = Change::from_record(record).unwrap();
//! assert_eq!(decoded, change);
//!
//! let mut undo = change.inverse().unwrap();
//! assert_eq!(undo.apply(&value).unwrap(), json!(["a"]));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
mod change;
mod error;
mod id;
mod record;
mod value_type;

pub use catalog::{Namespace, Variant};
pub use change::{Change, ItemChange, SetChange, ITEM_FIELD, OLD_VALUE_FIELD, VALUE_FIELD};
pub use error::{ChangeError, ChangeResult};
pub use id::ChangeId;
pub use record::{ChangeRecord, ID_FIELD, KIND_FIELD, VALUE_TYPE_FIELD};
pub use value_type::{ChangeKind, ValueType};
