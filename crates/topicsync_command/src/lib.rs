//! # topicsync Command
//!
//! Undoable commands over named topics, and the manager that records them.
//!
//! This crate provides:
//! - `Topic` / `TopicResolver`, the interface commands execute against
//! - `ChangeCommand`, a change bound to a topic name
//! - `CommandManager`, which records applied commands for atomic commit or rollback
//! - `RecordingSession`, the scope guard for a recording
//! - `MemoryTopic` and `TopicRegistry` in-memory implementations
//!
//! ## Recording a batch
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use topicsync_change::{Change, ValueType};
//! use topicsync_command::{ChangeCommand, CommandManager, TopicRegistry};
//!
//! let registry = Arc::new(TopicRegistry::new());
//! registry.create("title", ValueType::String);
//!
//! let mut manager = CommandManager::new();
//! {
//!     let mut session = manager.record(false).unwrap();
//!     session
//!         .add(ChangeCommand::new(registry.clone(), "title", Change::set_string("draft")))
//!         .unwrap();
//! }
//! assert_eq!(registry.value("title"), Some(json!("draft")));
//!
//! // Roll the preview back.
//! manager.reset().unwrap();
//! assert_eq!(registry.value("title"), Some(json!("")));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod command;
mod error;
mod manager;
mod topic;

pub use command::{ChangeCommand, CommandRecord};
pub use error::{CommandError, CommandResult};
pub use manager::{AddFn, CommandManager, RecordingSession, RecordingStopFn};
pub use topic::{MemoryTopic, Topic, TopicHandle, TopicRegistry, TopicResolver};
