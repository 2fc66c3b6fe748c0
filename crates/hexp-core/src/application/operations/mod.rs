//! Executors for the five operation kinds.
//!
//! Each executor resolves its paths through the [`ExecutionContext`], does
//! all I/O through the [`Filesystem`] port, and either fully completes its
//! single write or returns an [`OperationError`].

mod copy;
mod json_merge;
mod template_render;
mod text_insert;
mod text_replace;

use std::path::Path;

use crate::application::error::OperationError;
use crate::application::ports::{Filesystem, TemplateRenderer};
use crate::domain::{ExecutionContext, Operation, OperationResult};
use crate::error::HexpError;

pub use copy::execute_copy;
pub use json_merge::execute_json_merge;
pub use template_render::execute_template_render;
pub use text_insert::{execute_text_insert, insert_text};
pub use text_replace::{execute_text_replace, replace_text};

/// Run one operation to completion.
pub fn execute_operation(
    operation: &Operation,
    context: &ExecutionContext,
    fs: &dyn Filesystem,
    renderer: &dyn TemplateRenderer,
) -> Result<OperationResult, OperationError> {
    match operation {
        Operation::Copy(op) => execute_copy(op, context, fs),
        Operation::TemplateRender(op) => execute_template_render(op, context, fs, renderer),
        Operation::JsonMerge(op) => execute_json_merge(op, context, fs),
        Operation::TextInsert(op) => execute_text_insert(op, context, fs),
        Operation::TextReplace(op) => execute_text_replace(op, context, fs),
    }
}

fn io_error(path: &Path, cause: HexpError) -> OperationError {
    OperationError::Io {
        path: path.to_path_buf(),
        reason: cause.to_string(),
    }
}

fn ensure_parent(fs: &dyn Filesystem, path: &Path) -> Result<(), OperationError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !fs.exists(parent) => {
            fs.create_dir_all(parent).map_err(|e| io_error(parent, e))
        }
        _ => Ok(()),
    }
}
