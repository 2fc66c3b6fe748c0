use tracing::debug;

use super::{ensure_parent, io_error};
use crate::application::error::OperationError;
use crate::application::ports::Filesystem;
use crate::domain::{CopyOperation, ExecutionContext, OperationResult};

pub fn execute_copy(
    op: &CopyOperation,
    context: &ExecutionContext,
    fs: &dyn Filesystem,
) -> Result<OperationResult, OperationError> {
    let source = context.resolve_source(&op.from);
    let destination = context.resolve_destination(&op.to);

    if !fs.exists(&source) {
        return Err(OperationError::SourceNotFound {
            from: op.from.clone(),
        });
    }
    if fs.exists(&destination) && !op.overwrite {
        return Err(OperationError::DestinationExists { to: op.to.clone() });
    }

    if fs.is_dir(&source) {
        return Err(OperationError::SourceIsDirectory {
            from: op.from.clone(),
        });
    }

    ensure_parent(fs, &destination)?;

    fs.copy_file(&source, &destination)
        .map_err(|e| io_error(&destination, e))?;

    debug!(from = %op.from, to = %op.to, "copied");
    Ok(OperationResult::succeeded([op.to.as_str()]))
}
