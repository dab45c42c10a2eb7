//! Invert command implementation.

use std::path::Path;
use topicsync_change::Change;
use topicsync_command::CommandRecord;

/// Builds the batch that undoes `path`: every inverse, last record first.
///
/// Fails on the first `set` record that carries no captured `old_value`.
pub fn invert(path: &Path) -> Result<Vec<CommandRecord>, Box<dyn std::error::Error>> {
    let batch = super::load_batch(path)?;
    let mut inverted = Vec::with_capacity(batch.len());

    for (index, record) in batch.into_iter().enumerate() {
        let topic_name = record.topic_name;
        let inverse = Change::from_record(record.change)
            .and_then(|change| change.inverse())
            .map_err(|e| format!("record {index} ({topic_name}): {e}"))?;
        inverted.push(CommandRecord {
            topic_name,
            change: inverse.to_record(),
        });
    }

    inverted.reverse();
    Ok(inverted)
}

/// Runs the invert command.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let inverted = invert(path)?;
    println!("{}", serde_json::to_string_pretty(&inverted)?);
    Ok(())
}
