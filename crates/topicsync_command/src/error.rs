//! Error types for commands and the command manager.

use thiserror::Error;
use topicsync_change::ChangeError;

/// Result type for command operations.
pub type CommandResult<T> = Result<T, CommandError>;

/// Errors that can occur while executing commands or managing a recording.
#[derive(Debug, Clone, Error)]
pub enum CommandError {
    /// The change failed validation, decoding or inversion.
    #[error(transparent)]
    Change(#[from] ChangeError),

    /// A recording session was started while another one was active.
    #[error("the command manager is already recording")]
    AlreadyRecording,

    /// The command's topic name did not resolve to a live topic.
    #[error("topic not found: {name}")]
    TopicNotFound {
        /// The unresolved topic name.
        name: String,
    },
}

impl CommandError {
    /// Creates a topic not found error.
    pub fn topic_not_found(name: impl Into<String>) -> Self {
        Self::TopicNotFound { name: name.into() }
    }

    /// Returns true if a change was rejected by its target value.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Change(e) if e.is_validation())
    }

    /// Returns true if a record could not be decoded.
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Change(e) if e.is_protocol())
    }

    /// Returns true if a recording session overlapped another.
    pub fn is_concurrency(&self) -> bool {
        matches!(self, Self::AlreadyRecording)
    }

    /// Returns true if a topic name failed to resolve.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TopicNotFound { .. })
    }
}
