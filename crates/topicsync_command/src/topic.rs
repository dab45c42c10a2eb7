//! Topics as command targets, and name-based resolution.

use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use topicsync_change::{Change, ChangeError, ChangeResult, ValueType};

/// A named container for a current value.
///
/// Topics are the execution target of commands. Implementations must reject
/// a change that does not hold against the current value with a validation
/// error and leave the value untouched; they must never silently ignore it.
pub trait Topic {
    /// Returns the topic name.
    fn name(&self) -> &str;

    /// Returns the type of the topic's value.
    fn value_type(&self) -> ValueType;

    /// Returns the current value.
    fn value(&self) -> &Value;

    /// Applies a change to the current value.
    fn apply_change(&mut self, change: &mut Change) -> ChangeResult<()>;
}

/// A shared, lockable topic.
pub type TopicHandle = Arc<Mutex<dyn Topic + Send>>;

/// Resolves topic names to live topics.
///
/// Commands hold a resolver and a name instead of the topic itself, so a
/// topic may be deleted and re-created under the same name between the
/// construction of a command and its execution.
pub trait TopicResolver: Send + Sync {
    /// Looks up a topic by name.
    fn resolve(&self, name: &str) -> Option<TopicHandle>;
}

impl<F> TopicResolver for F
where
    F: Fn(&str) -> Option<TopicHandle> + Send + Sync,
{
    fn resolve(&self, name: &str) -> Option<TopicHandle> {
        self(name)
    }
}

/// An in-memory topic.
#[derive(Debug, Clone)]
pub struct MemoryTopic {
    name: String,
    value_type: ValueType,
    value: Value,
}

impl MemoryTopic {
    /// Creates a topic holding the default value of its type.
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            value: value_type.default_value(),
        }
    }

    /// Creates a topic with an initial value.
    ///
    /// Returns `None` if the value does not fit the value type.
    pub fn with_value(name: impl Into<String>, value_type: ValueType, value: Value) -> Option<Self> {
        value_type.accepts(&value).then(|| Self {
            name: name.into(),
            value_type,
            value,
        })
    }
}

impl Topic for MemoryTopic {
    fn name(&self) -> &str {
        &self.name
    }

    fn value_type(&self) -> ValueType {
        self.value_type
    }

    fn value(&self) -> &Value {
        &self.value
    }

    fn apply_change(&mut self, change: &mut Change) -> ChangeResult<()> {
        if change.value_type() != self.value_type {
            let reason = format!(
                "{} change applied to a {} topic",
                change.value_type(),
                self.value_type
            );
            return Err(ChangeError::validation(change.to_record(), reason).with_topic(&self.name));
        }

        let value = change
            .apply(&self.value)
            .map_err(|e| e.with_topic(&self.name))?;
        tracing::trace!(topic = %self.name, kind = %change.kind(), id = %change.id(), "applied change");
        self.value = value;
        Ok(())
    }
}

/// An in-memory registry of topics, keyed by name.
///
/// The registry is a stand-in for a service's topic store: it resolves
/// names for commands and lets tests and tools create, delete and inspect
/// topics. It enforces no lifecycle policy.
#[derive(Default)]
pub struct TopicRegistry {
    topics: RwLock<HashMap<String, TopicHandle>>,
}

impl TopicRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a topic, replacing any topic with the same name.
    pub fn insert<T>(&self, topic: T) -> TopicHandle
    where
        T: Topic + Send + 'static,
    {
        let name = topic.name().to_string();
        let handle: TopicHandle = Arc::new(Mutex::new(topic));
        self.topics.write().insert(name, Arc::clone(&handle));
        handle
    }

    /// Registers a topic holding the default value of its type.
    pub fn create(&self, name: impl Into<String>, value_type: ValueType) -> TopicHandle {
        self.insert(MemoryTopic::new(name, value_type))
    }

    /// Unregisters a topic.
    pub fn remove(&self, name: &str) -> Option<TopicHandle> {
        self.topics.write().remove(name)
    }

    /// Returns a topic by name.
    pub fn get(&self, name: &str) -> Option<TopicHandle> {
        self.topics.read().get(name).cloned()
    }

    /// Returns the current value of a topic.
    pub fn value(&self, name: &str) -> Option<Value> {
        self.get(name).map(|topic| topic.lock().value().clone())
    }

    /// Returns true if a topic with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.topics.read().contains_key(name)
    }

    /// Returns the registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.topics.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns every topic's current value, keyed by name.
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.topics
            .read()
            .iter()
            .map(|(name, topic)| (name.clone(), topic.lock().value().clone()))
            .collect()
    }

    /// Returns the number of registered topics.
    pub fn len(&self) -> usize {
        self.topics.read().len()
    }

    /// Returns true if no topics are registered.
    pub fn is_empty(&self) -> bool {
        self.topics.read().is_empty()
    }
}

impl TopicResolver for TopicRegistry {
    fn resolve(&self, name: &str) -> Option<TopicHandle> {
        self.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_topic_applies_changes() {
        let mut topic = MemoryTopic::new("title", ValueType::String);
        assert_eq!(topic.value(), &json!(""));

        topic.apply_change(&mut Change::set_string("hello")).unwrap();
        assert_eq!(topic.value(), &json!("hello"));
    }

    #[test]
    fn failed_change_names_topic_and_keeps_value() {
        let mut topic =
            MemoryTopic::with_value("members", ValueType::Collection, json!(["a", "b"])).unwrap();

        let err = topic.apply_change(&mut Change::remove("z")).unwrap_err();
        match err {
            ChangeError::Validation { topic: name, .. } => {
                assert_eq!(name.as_deref(), Some("members"))
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(topic.value(), &json!(["a", "b"]));
    }

    #[test]
    fn rejects_changes_for_other_value_types() {
        let mut topic = MemoryTopic::new("count", ValueType::Int);
        let err = topic.apply_change(&mut Change::append(1)).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(topic.value(), &json!(0));
    }

    #[test]
    fn with_value_checks_type() {
        assert!(MemoryTopic::with_value("t", ValueType::Bool, json!(1)).is_none());
        assert!(MemoryTopic::with_value("t", ValueType::Bool, json!(true)).is_some());
    }

    #[test]
    fn registry_resolves_by_name() {
        let registry = TopicRegistry::new();
        registry.create("b", ValueType::Int);
        registry.create("a", ValueType::String);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["a".to_string(), "b".to_string()]);
        assert!(registry.resolve("a").is_some());
        assert!(registry.resolve("c").is_none());

        assert!(registry.remove("a").is_some());
        assert!(!registry.contains("a"));
        assert_eq!(registry.snapshot().get("b"), Some(&json!(0)));
    }

    #[test]
    fn closures_are_resolvers() {
        let registry = Arc::new(TopicRegistry::new());
        registry.create("x", ValueType::Bool);

        let inner = Arc::clone(&registry);
        let resolver = move |name: &str| inner.get(name);
        assert!(resolver.resolve("x").is_some());
        assert!(resolver.resolve("y").is_none());
    }
}
