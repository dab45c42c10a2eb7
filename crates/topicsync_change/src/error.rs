//! Error types for topic changes.

use crate::id::ChangeId;
use crate::record::ChangeRecord;
use thiserror::Error;

/// Result type for change operations.
pub type ChangeResult<T> = Result<T, ChangeError>;

/// Errors that can occur while applying, inverting or decoding a change.
#[derive(Debug, Clone, Error)]
pub enum ChangeError {
    /// The change's preconditions do not hold against the current value.
    ///
    /// The value the change was applied to is left unmodified.
    #[error(
        "invalid change {record} for topic {}: {reason}",
        .topic.as_deref().unwrap_or("unknown")
    )]
    Validation {
        /// Name of the topic the change targeted, if known.
        topic: Option<String>,
        /// The offending change in wire form.
        record: Box<ChangeRecord>,
        /// Human-readable reason.
        reason: String,
    },

    /// A wire record could not be decoded.
    #[error("protocol error: {message}")]
    Protocol {
        /// Description of the malformed record.
        message: String,
    },

    /// The inverse of a full-replace change was requested before it was applied.
    #[error("change {id} has no captured pre-image; apply it before inverting")]
    InverseUnavailable {
        /// Identity of the change.
        id: ChangeId,
    },
}

impl ChangeError {
    /// Creates a validation error that is not yet attributed to a topic.
    pub fn validation(record: ChangeRecord, reason: impl Into<String>) -> Self {
        Self::Validation {
            topic: None,
            record: Box::new(record),
            reason: reason.into(),
        }
    }

    /// Creates a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Attributes a validation error to the named topic.
    ///
    /// Other variants are returned unchanged.
    #[must_use]
    pub fn with_topic(self, name: impl Into<String>) -> Self {
        match self {
            Self::Validation { record, reason, .. } => Self::Validation {
                topic: Some(name.into()),
                record,
                reason,
            },
            other => other,
        }
    }

    /// Returns true for validation errors.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns true for protocol errors.
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::Change;
    use serde_json::json;

    #[test]
    fn validation_display_names_topic() {
        let change = Change::remove(json!("z"));
        let err = ChangeError::validation(change.to_record(), "item not present")
            .with_topic("members");

        let text = err.to_string();
        assert!(text.contains("for topic members"));
        assert!(text.contains("item not present"));
        assert!(text.contains("\"kind\":\"remove\""));
    }

    #[test]
    fn validation_display_without_topic() {
        let change = Change::remove(json!(1));
        let err = ChangeError::validation(change.to_record(), "nope");
        assert!(err.to_string().contains("for topic unknown"));
    }

    #[test]
    fn with_topic_leaves_protocol_errors_alone() {
        let err = ChangeError::protocol("bad").with_topic("t");
        assert!(err.is_protocol());
        assert_eq!(err.to_string(), "protocol error: bad");
    }
}
