use tracing::debug;

use super::io_error;
use crate::application::error::OperationError;
use crate::application::ports::Filesystem;
use crate::domain::{ExecutionContext, InsertPosition, OperationResult, TextInsertOperation};

pub fn execute_text_insert(
    op: &TextInsertOperation,
    context: &ExecutionContext,
    fs: &dyn Filesystem,
) -> Result<OperationResult, OperationError> {
    let target = context.resolve_destination(&op.target);
    if !fs.exists(&target) {
        return Err(OperationError::TargetNotFound {
            target: op.target.clone(),
        });
    }

    let content = fs.read_to_string(&target).map_err(|e| io_error(&target, e))?;
    let updated = insert_text(&content, &op.marker, &op.content, op.position).ok_or_else(|| {
        OperationError::MarkerNotFound {
            marker: op.marker.clone(),
        }
    })?;

    fs.write_file(&target, &updated)
        .map_err(|e| io_error(&target, e))?;

    debug!(target = %op.target, position = ?op.position, "inserted text");
    Ok(OperationResult::succeeded([op.target.as_str()]))
}

/// Splice `insertion` next to the first occurrence of `marker`.
///
/// Returns `None` when the marker does not occur.
pub fn insert_text(
    content: &str,
    marker: &str,
    insertion: &str,
    position: InsertPosition,
) -> Option<String> {
    let index = content.find(marker)?;
    let at = match position {
        InsertPosition::Before => index,
        InsertPosition::After => index + marker.len(),
    };

    let mut out = String::with_capacity(content.len() + insertion.len());
    out.push_str(&content[..at]);
    out.push_str(insertion);
    out.push_str(&content[at..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_after_marker_by_default() {
        let out = insert_text("a\n// routes\nb", "// routes", "\nx()", InsertPosition::default()).unwrap();
        assert_eq!(out, "a\n// routes\nx()\nb");
    }

    #[test]
    fn inserts_before_marker() {
        let out = insert_text("head<!-- end -->", "<!-- end -->", "<meta>", InsertPosition::Before).unwrap();
        assert_eq!(out, "head<meta><!-- end -->");
    }

    #[test]
    fn only_first_marker_is_used() {
        let out = insert_text("M M", "M", "!", InsertPosition::After).unwrap();
        assert_eq!(out, "M! M");
    }

    #[test]
    fn missing_marker_yields_none() {
        assert!(insert_text("abc", "zzz", "x", InsertPosition::After).is_none());
    }

    #[test]
    fn multibyte_content_is_preserved() {
        let out = insert_text("héllo ✓ wörld", "✓", "→", InsertPosition::After).unwrap();
        assert_eq!(out, "héllo ✓→ wörld");
    }
}
