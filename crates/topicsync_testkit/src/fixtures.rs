//! Topic fixtures and command builders.

use serde_json::Value;
use std::sync::Arc;
use topicsync_change::{Change, ValueType};
use topicsync_command::{ChangeCommand, MemoryTopic, TopicRegistry, TopicResolver};

/// A registry of in-memory topics with helpers for building commands
/// against it.
#[derive(Clone, Default)]
pub struct TopicFixture {
    /// The registry.
    pub registry: Arc<TopicRegistry>,
}

impl TopicFixture {
    /// Creates an empty fixture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a topic holding the default value of its type.
    #[must_use]
    pub fn with_topic(self, name: &str, value_type: ValueType) -> Self {
        self.registry.create(name, value_type);
        self
    }

    /// Adds a topic with an initial value.
    ///
    /// # Panics
    ///
    /// Panics if the value does not fit the value type.
    #[must_use]
    pub fn with_value(self, name: &str, value_type: ValueType, value: Value) -> Self {
        let topic = MemoryTopic::with_value(name, value_type, value)
            .expect("fixture value does not match its value type");
        self.registry.insert(topic);
        self
    }

    /// Returns the registry as a resolver.
    pub fn resolver(&self) -> Arc<dyn TopicResolver> {
        self.registry.clone()
    }

    /// Returns a topic's current value.
    ///
    /// # Panics
    ///
    /// Panics if the topic does not exist.
    pub fn value(&self, name: &str) -> Value {
        self.registry
            .value(name)
            .unwrap_or_else(|| panic!("no topic named {name}"))
    }

    /// Builds a command for an arbitrary change.
    pub fn command(&self, name: &str, change: Change) -> ChangeCommand {
        ChangeCommand::new(self.resolver(), name, change)
    }

    /// Builds a full-replace command.
    pub fn set(&self, name: &str, value_type: ValueType, value: impl Into<Value>) -> ChangeCommand {
        self.command(name, Change::set(value_type, value))
    }

    /// Builds a collection append command.
    pub fn append(&self, name: &str, item: impl Into<Value>) -> ChangeCommand {
        self.command(name, Change::append(item))
    }

    /// Builds a collection remove command.
    pub fn remove(&self, name: &str, item: impl Into<Value>) -> ChangeCommand {
        self.command(name, Change::remove(item))
    }
}
