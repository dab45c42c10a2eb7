//! CLI command implementations.

pub mod check;
pub mod invert;
pub mod replay;

use std::fs;
use std::path::Path;
use topicsync_command::CommandRecord;

/// Reads a batch file: a JSON array of command records.
pub fn load_batch(path: &Path) -> Result<Vec<CommandRecord>, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let records: Vec<CommandRecord> = serde_json::from_str(&text)
        .map_err(|e| format!("{} is not a command batch: {e}", path.display()))?;
    tracing::info!(path = %path.display(), records = records.len(), "loaded batch");
    Ok(records)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Writes `json` to a temporary batch file.
    pub fn batch_file(json: serde_json::Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{json}").unwrap();
        file
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::batch_file;
    use super::*;
    use serde_json::json;

    #[test]
    fn loads_records() {
        let file = batch_file(json!([
            {"topic_name": "t", "change": {"value_type": "collection", "kind": "append", "id": "x", "item": 1}}
        ]));
        let records = load_batch(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].topic_name, "t");
    }

    #[test]
    fn rejects_non_batch() {
        let file = batch_file(json!({"topic_name": "t"}));
        let err = load_batch(file.path()).unwrap_err();
        assert!(err.to_string().contains("is not a command batch"));
    }

    #[test]
    fn reports_missing_file() {
        let err = load_batch(Path::new("/nonexistent/batch.json")).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }
}
