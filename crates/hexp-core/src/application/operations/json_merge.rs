use serde_json::{Map, Value};
use tracing::debug;

use super::{ensure_parent, io_error};
use crate::application::error::OperationError;
use crate::application::ports::Filesystem;
use crate::domain::json_merge::merged;
use crate::domain::{ExecutionContext, JsonMergeOperation, OperationResult};

pub fn execute_json_merge(
    op: &JsonMergeOperation,
    context: &ExecutionContext,
    fs: &dyn Filesystem,
) -> Result<OperationResult, OperationError> {
    let target = context.resolve_destination(&op.target);

    let existing = if fs.exists(&target) {
        let content = fs.read_to_string(&target).map_err(|e| OperationError::InvalidJson {
            target: op.target.clone(),
            reason: e.to_string(),
        })?;
        serde_json::from_str::<Value>(&content).map_err(|e| OperationError::InvalidJson {
            target: op.target.clone(),
            reason: e.to_string(),
        })?
    } else {
        Value::Object(Map::new())
    };

    let document = merged(existing, &op.data, op.array_merge);
    let formatted = serde_json::to_string_pretty(&document)
        .map_err(|e| OperationError::MergedJsonInvalid { reason: e.to_string() })?;
    serde_json::from_str::<Value>(&formatted)
        .map_err(|e| OperationError::MergedJsonInvalid { reason: e.to_string() })?;

    ensure_parent(fs, &target)?;
    fs.write_file(&target, &formatted)
        .map_err(|e| io_error(&target, e))?;

    debug!(target = %op.target, strategy = ?op.array_merge, "merged json");
    Ok(OperationResult::succeeded([op.target.as_str()]))
}
