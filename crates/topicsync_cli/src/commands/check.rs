//! Check command implementation.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use topicsync_change::Change;

/// Result of checking a batch.
#[derive(Debug, Serialize)]
pub struct CheckResult {
    /// Number of records in the batch.
    pub records: usize,
    /// Record count per `value_type/kind`.
    pub variants: BTreeMap<String, usize>,
    /// Number of records whose inverse can be built: every append and remove,
    /// and the `set` records that carry a captured `old_value`.
    pub invertible: usize,
}

/// Decodes every change in a batch without applying anything.
pub fn check(path: &Path) -> Result<CheckResult, Box<dyn std::error::Error>> {
    let batch = super::load_batch(path)?;
    let mut result = CheckResult {
        records: batch.len(),
        variants: BTreeMap::new(),
        invertible: 0,
    };

    for (index, record) in batch.into_iter().enumerate() {
        let change = Change::from_record(record.change)
            .map_err(|e| format!("record {index} ({}): {e}", record.topic_name))?;
        let key = format!("{}/{}", change.value_type(), change.kind());
        *result.variants.entry(key).or_insert(0) += 1;
        if change.is_invertible() {
            result.invertible += 1;
        }
    }

    Ok(result)
}

/// Runs the check command.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let result = check(path)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
