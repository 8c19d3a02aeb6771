use std::path::Path;
use tracing::trace;

use crate::error::ExtractError;

/// One tab-joined line per record. Malformed records are dropped, the rest kept.
pub(super) fn extract(path: &Path) -> Result<String, ExtractError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut text = String::new();
    for (index, record) in reader.records().enumerate() {
        match record {
            Ok(record) => {
                text.push_str(&record.iter().collect::<Vec<_>>().join("\t"));
                text.push('\n');
            }
            Err(err) => trace!(record = index, error = %err, "Skipping malformed CSV record"),
        }
    }
    Ok(text)
}
