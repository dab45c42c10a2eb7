//! # topicsync Testkit
//!
//! Test utilities for topicsync.
//!
//! This crate provides:
//! - Topic fixtures and command builders
//! - Property-based test generators using proptest
//! - Wire test vectors for change records
//!
//! ## Usage
//!
//! ```rust
//! use topicsync_change::ValueType;
//! use topicsync_command::CommandManager;
//! use topicsync_testkit::prelude::*;
//!
//! let fixture = TopicFixture::new().with_topic("n", ValueType::Int);
//! let mut manager = CommandManager::new();
//! manager.start_recording().unwrap();
//! manager.add(fixture.set("n", ValueType::Int, 4)).unwrap();
//! manager.reset().unwrap();
//! assert_eq!(fixture.value("n"), serde_json::json!(0));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod vectors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::vectors::*;
}

pub use fixtures::*;
pub use generators::*;
pub use vectors::*;
