//! Change commands.

use crate::error::{CommandError, CommandResult};
use crate::topic::{TopicHandle, TopicResolver};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use topicsync_change::{Change, ChangeRecord};

/// Serialized form of a [`ChangeCommand`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandRecord {
    /// Name of the target topic.
    pub topic_name: String,
    /// The change in wire form.
    pub change: ChangeRecord,
}

/// A change bound to a named topic.
///
/// The command stores the topic's name and a resolver, never the topic
/// itself. The name is resolved on every `execute`, `undo` and `redo`; a
/// name that no longer resolves fails with [`CommandError::TopicNotFound`]
/// at that point, not when the command is built or decoded.
#[derive(Clone)]
pub struct ChangeCommand {
    resolver: Arc<dyn TopicResolver>,
    topic_name: String,
    change: Change,
    preview: bool,
}

impl ChangeCommand {
    /// Creates a command.
    pub fn new(
        resolver: Arc<dyn TopicResolver>,
        topic_name: impl Into<String>,
        change: Change,
    ) -> Self {
        Self {
            resolver,
            topic_name: topic_name.into(),
            change,
            preview: false,
        }
    }

    /// Marks the command as part of a speculative preview.
    #[must_use]
    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    /// Returns the target topic name.
    pub fn topic_name(&self) -> &str {
        &self.topic_name
    }

    /// Returns the change.
    pub fn change(&self) -> &Change {
        &self.change
    }

    /// Returns true if the command belongs to a speculative preview.
    pub fn is_preview(&self) -> bool {
        self.preview
    }

    fn resolve(&self) -> CommandResult<TopicHandle> {
        self.resolver
            .resolve(&self.topic_name)
            .ok_or_else(|| CommandError::topic_not_found(&self.topic_name))
    }

    /// Applies the change to the resolved topic.
    pub fn execute(&mut self) -> CommandResult<()> {
        let topic = self.resolve()?;
        topic.lock().apply_change(&mut self.change)?;
        Ok(())
    }

    /// Applies the inverse of the change to the resolved topic.
    ///
    /// For a full-replace change this restores the value observed by the
    /// last `execute` or `redo`.
    pub fn undo(&mut self) -> CommandResult<()> {
        let topic = self.resolve()?;
        let mut inverse = self.change.inverse()?;
        topic.lock().apply_change(&mut inverse)?;
        Ok(())
    }

    /// Re-applies the change to the resolved topic.
    pub fn redo(&mut self) -> CommandResult<()> {
        self.execute()
    }

    /// Converts to the serialized form.
    pub fn to_record(&self) -> CommandRecord {
        CommandRecord {
            topic_name: self.topic_name.clone(),
            change: self.change.to_record(),
        }
    }

    /// Rebuilds a command from its serialized form.
    ///
    /// The change is decoded through the catalog; the topic is not resolved.
    pub fn from_record(
        record: CommandRecord,
        resolver: Arc<dyn TopicResolver>,
    ) -> CommandResult<Self> {
        let change = Change::from_record(record.change)?;
        Ok(Self::new(resolver, record.topic_name, change))
    }
}

impl fmt::Debug for ChangeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeCommand")
            .field("topic_name", &self.topic_name)
            .field("change", &self.change)
            .field("preview", &self.preview)
            .finish_non_exhaustive()
    }
}
