use std::{fs, path::Path};

use tracing::{info, warn};

use super::write_atomic;
use crate::{
    errors::StatementResult,
    ledger::{TemplateRecord, TransactionTemplate},
};

/// Loads a JSON array of template records, converting each one.
///
/// The first record that fails validation aborts the whole load.
pub fn load_templates(path: &Path) -> StatementResult<Vec<TransactionTemplate>> {
    let data = fs::read_to_string(path)?;
    let records: Vec<TemplateRecord> = serde_json::from_str(&data)?;
    let mut templates = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match TransactionTemplate::try_from(record) {
            Ok(template) => templates.push(template),
            Err(err) => {
                warn!(path = %path.display(), index, error = %err, "rejected template record");
                return Err(err);
            }
        }
    }
    info!(path = %path.display(), count = templates.len(), "loaded templates");
    Ok(templates)
}

/// Writes templates back out as records, staging through a temporary file.
pub fn save_templates(templates: &[TransactionTemplate], path: &Path) -> StatementResult<()> {
    let records: Vec<TemplateRecord> = templates.iter().map(TemplateRecord::from).collect();
    let json = serde_json::to_string_pretty(&records)?;
    write_atomic(path, &json)
}
