use tracing::debug;

use super::{ensure_parent, io_error};
use crate::application::error::OperationError;
use crate::application::ports::{Filesystem, TemplateRenderer};
use crate::domain::{ExecutionContext, OperationResult, TemplateRenderOperation};

pub fn execute_template_render(
    op: &TemplateRenderOperation,
    context: &ExecutionContext,
    fs: &dyn Filesystem,
    renderer: &dyn TemplateRenderer,
) -> Result<OperationResult, OperationError> {
    let source = context.resolve_source(&op.from);
    let destination = context.resolve_destination(&op.to);

    if !fs.exists(&source) {
        return Err(OperationError::TemplateSourceNotFound {
            from: op.from.clone(),
        });
    }

    let failed = |reason: String| OperationError::Render {
        from: op.from.clone(),
        to: op.to.clone(),
        reason,
    };

    let template = fs
        .read_to_string(&source)
        .map_err(|e| failed(e.to_string()))?;
    let rendered = renderer
        .render(&template, &context.variables)
        .map_err(|e| failed(e.to_string()))?;

    ensure_parent(fs, &destination)?;
    fs.write_file(&destination, &rendered)
        .map_err(|e| io_error(&destination, e))?;

    debug!(from = %op.from, to = %op.to, bytes = rendered.len(), "rendered");
    Ok(OperationResult::succeeded([op.to.as_str()]))
}
