//! Replay command implementation.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use topicsync_change::ValueType;
use topicsync_command::{
    ChangeCommand, CommandManager, CommandRecord, MemoryTopic, TopicRegistry,
};

/// A topic to create before replaying, given as `name=value_type[=json]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicSpec {
    /// Topic name.
    pub name: String,
    /// Value type of the topic.
    pub value_type: ValueType,
    /// Initial value; the type's default when absent.
    pub value: Option<Value>,
}

impl FromStr for TopicSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '=');
        let name = parts.next().unwrap_or_default();
        if name.is_empty() {
            return Err(format!("'{s}': missing topic name"));
        }
        let tag = parts
            .next()
            .ok_or_else(|| format!("'{s}': expected name=value_type[=json]"))?;
        let value_type =
            ValueType::from_tag(tag).ok_or_else(|| format!("'{s}': unknown value type '{tag}'"))?;
        let value = parts
            .next()
            .map(serde_json::from_str::<Value>)
            .transpose()
            .map_err(|e| format!("'{s}': invalid initial value: {e}"))?;

        Ok(Self {
            name: name.to_string(),
            value_type,
            value,
        })
    }
}

/// Outcome of a replay.
#[derive(Debug, Serialize)]
pub struct ReplayReport {
    /// Number of commands applied.
    pub applied: usize,
    /// True if the applied commands were undone again.
    pub rolled_back: bool,
    /// Final value of every topic.
    pub topics: BTreeMap<String, Value>,
}

fn build_registry(topics: &[TopicSpec]) -> Result<Arc<TopicRegistry>, Box<dyn std::error::Error>> {
    let registry = Arc::new(TopicRegistry::new());
    for spec in topics {
        match &spec.value {
            Some(value) => {
                let topic = MemoryTopic::with_value(&spec.name, spec.value_type, value.clone())
                    .ok_or_else(|| {
                        format!("{value} is not a valid {} value for topic {}", spec.value_type, spec.name)
                    })?;
                registry.insert(topic);
            }
            None => {
                registry.create(&spec.name, spec.value_type);
            }
        }
    }
    Ok(registry)
}

fn apply_batch(
    manager: &mut CommandManager,
    batch: Vec<CommandRecord>,
    registry: &Arc<TopicRegistry>,
) -> Result<(), Box<dyn std::error::Error>> {
    for (index, record) in batch.into_iter().enumerate() {
        let topic = record.topic_name.clone();
        let command = ChangeCommand::from_record(record, registry.clone())
            .map_err(|e| format!("record {index} ({topic}): {e}"))?;
        manager
            .add(command)
            .map_err(|e| format!("record {index} ({topic}): {e}"))?;
    }
    Ok(())
}

/// Replays a batch against freshly created topics.
///
/// The batch is applied inside one recording session. If any command fails,
/// everything applied so far is undone and the error is returned. With
/// `preview`, the batch is undone after a successful replay as well.
pub fn replay(
    path: &Path,
    topics: &[TopicSpec],
    preview: bool,
) -> Result<ReplayReport, Box<dyn std::error::Error>> {
    let registry = build_registry(topics)?;
    let batch = super::load_batch(path)?;
    let mut manager = CommandManager::new();

    let outcome = {
        let mut session = manager.record(false)?;
        apply_batch(&mut session, batch, &registry)
    };

    if let Err(e) = outcome {
        if let Err(reset_err) = manager.reset() {
            tracing::error!(error = %reset_err, "rollback after failed replay did not complete");
        }
        return Err(e);
    }

    let applied = manager.len();
    if preview {
        manager.reset()?;
        tracing::info!(applied, "preview replay rolled back");
    } else {
        manager.commit();
        tracing::info!(applied, "replay committed");
    }

    Ok(ReplayReport {
        applied,
        rolled_back: preview,
        topics: registry.snapshot(),
    })
}

/// Runs the replay command.
pub fn run(path: &Path, topics: &[TopicSpec], preview: bool) -> Result<(), Box<dyn std::error::Error>> {
    let report = replay(path, topics, preview)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::batch_file;
    use serde_json::json;

    const ID: &str = "0b7f3c8e-9d3a-4c1e-b2f0-5a6d7e8f9a0b";

    fn topics(specs: &[&str]) -> Vec<TopicSpec> {
        specs.iter().map(|s| s.parse().unwrap()).collect()
    }

    fn sample_batch() -> serde_json::Value {
        json!([
            {"topic_name": "tags", "change": {"value_type": "collection", "kind": "append", "id": ID, "item": "c"}},
            {"topic_name": "tags", "change": {"value_type": "collection", "kind": "remove", "id": ID, "item": "a"}},
            {"topic_name": "title", "change": {"value_type": "string", "kind": "set", "id": ID, "value": "done", "old_value": null}},
        ])
    }

    #[test]
    fn parses_topic_specs() {
        let spec: TopicSpec = "tags=collection=[\"a\"]".parse().unwrap();
        assert_eq!(spec.name, "tags");
        assert_eq!(spec.value_type, ValueType::Collection);
        assert_eq!(spec.value, Some(json!(["a"])));

        let spec: TopicSpec = "n=int".parse().unwrap();
        assert_eq!(spec.value, None);

        let spec: TopicSpec = "eq=string=\"a=b\"".parse().unwrap();
        assert_eq!(spec.value, Some(json!("a=b")));
    }

    #[test]
    fn rejects_bad_topic_specs() {
        assert!("title".parse::<TopicSpec>().unwrap_err().contains("expected"));
        assert!("=int".parse::<TopicSpec>().unwrap_err().contains("missing topic name"));
        assert!("t=tuple".parse::<TopicSpec>().unwrap_err().contains("unknown value type"));
        assert!("t=int={".parse::<TopicSpec>().unwrap_err().contains("invalid initial value"));
    }

    #[test]
    fn commits_replayed_batch() {
        let file = batch_file(sample_batch());
        let report = replay(
            file.path(),
            &topics(&["tags=collection=[\"a\",\"b\"]", "title=string"]),
            false,
        )
        .unwrap();

        assert_eq!(report.applied, 3);
        assert!(!report.rolled_back);
        assert_eq!(report.topics["tags"], json!(["b", "c"]));
        assert_eq!(report.topics["title"], json!("done"));
    }

    #[test]
    fn preview_rolls_back() {
        let file = batch_file(sample_batch());
        let report = replay(
            file.path(),
            &topics(&["tags=collection=[\"a\",\"b\"]", "title=string=\"draft\""]),
            true,
        )
        .unwrap();

        assert_eq!(report.applied, 3);
        assert!(report.rolled_back);
        assert!(ValueType::Collection.values_equal(&report.topics["tags"], &json!(["a", "b"])));
        assert_eq!(report.topics["title"], json!("draft"));
    }

    #[test]
    fn failure_names_record() {
        let file = batch_file(json!([
            {"topic_name": "tags", "change": {"value_type": "collection", "kind": "append", "id": ID, "item": "c"}},
            {"topic_name": "tags", "change": {"value_type": "collection", "kind": "remove", "id": ID, "item": "zzz"}},
        ]));
        let err = replay(file.path(), &topics(&["tags=collection"]), false).unwrap_err();
        assert!(err.to_string().starts_with("record 1 (tags)"));
    }

    #[test]
    fn missing_topic_fails() {
        let file = batch_file(sample_batch());
        let err = replay(file.path(), &topics(&["tags=collection=[\"a\"]"]), false).unwrap_err();
        assert!(err.to_string().contains("topic not found: title"));
    }

    #[test]
    fn rejects_initial_value_of_wrong_type() {
        let file = batch_file(json!([]));
        let err = replay(file.path(), &topics(&["n=int=\"x\""]), false).unwrap_err();
        assert!(err.to_string().contains("is not a valid int value"));
    }
}
