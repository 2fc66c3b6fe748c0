//! The error type every public hexp-core entry point returns.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// A manifest rule violation or an orchestration failure.
#[derive(Debug, Error, Clone)]
pub enum HexpError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Application(#[from] ApplicationError),
}

impl HexpError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
            },
            Self::Application(e) => e.category(),
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}

pub type HexpResult<T> = Result<T, HexpError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{OperationError, Stage};
    use crate::domain::Operation;

    #[test]
    fn domain_categories_are_mapped() {
        let err: HexpError = DomainError::TemplateNotFound {
            kind: "base",
            id: "x".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn lock_errors_are_internal() {
        let err: HexpError = ApplicationError::StoreLockError.into();
        assert_eq!(err.category(), ErrorCategory::Internal);
    }

    #[test]
    fn operation_failures_keep_the_executor_suggestions() {
        let err: HexpError = ApplicationError::OperationFailed {
            stage: Stage::Addon("eslint".into()),
            operation: Box::new(Operation::text_insert("a", "//", "x")),
            source: OperationError::MarkerNotFound { marker: "//".into() },
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(err.suggestions()[0].contains("'//'"));
    }
}
