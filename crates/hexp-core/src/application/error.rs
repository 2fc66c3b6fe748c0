//! Application layer errors.
//!
//! These errors represent failures in orchestration and file operations,
//! not manifest rules. Manifest errors are `DomainError` from `crate::domain`.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::Operation;
use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Catalog cache access failed (lock poisoned).
    #[error("Template catalog lock poisoned")]
    StoreLockError,

    /// Template rendering failed outside an operation.
    #[error("Template rendering failed: {reason}")]
    RenderingFailed { reason: String },

    /// Workspace could not be created or removed.
    #[error("Workspace error at {path}: {reason}")]
    WorkspaceError { path: PathBuf, reason: String },

    /// A selected template has no directory on disk.
    #[error("No directory found for {kind} template '{id}'")]
    TemplateDirectoryMissing { kind: &'static str, id: String },

    /// An operation failed while the engine was applying a template.
    #[error("Failed to apply {stage} operation: {source}")]
    OperationFailed {
        stage: Stage,
        operation: Box<Operation>,
        source: OperationError,
    },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::StoreLockError => vec![
                "The template catalog is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::TemplateDirectoryMissing { id, .. } => vec![
                format!("Template '{}' is listed but its folder is gone", id),
                "Check templates.dir in your configuration".into(),
            ],
            Self::OperationFailed { source, .. } => source.suggestions(),
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FilesystemError { .. } | Self::WorkspaceError { .. } => ErrorCategory::Internal,
            Self::StoreLockError | Self::RenderingFailed { .. } => ErrorCategory::Internal,
            Self::TemplateDirectoryMissing { .. } => ErrorCategory::NotFound,
            Self::OperationFailed { source, .. } => source.category(),
        }
    }
}

/// Which template the engine was applying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Base,
    Addon(String),
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => f.write_str("base template"),
            Self::Addon(id) => write!(f, "addon '{id}'"),
        }
    }
}

// ============================================================================
// Operation executors
// ============================================================================

/// Failure of a single executor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OperationError {
    #[error("Source file does not exist: {from}")]
    SourceNotFound { from: String },

    #[error("Template source file does not exist: {from}")]
    TemplateSourceNotFound { from: String },

    #[error("Copying directories is not yet supported. Source is a directory: {from}")]
    SourceIsDirectory { from: String },

    #[error("Destination file already exists: {to}. Use overwrite: true to replace it.")]
    DestinationExists { to: String },

    #[error("Target file does not exist: {target}")]
    TargetNotFound { target: String },

    #[error("Failed to parse existing JSON file at {target}: {reason}")]
    InvalidJson { target: String, reason: String },

    #[error("Merged JSON is invalid: {reason}")]
    MergedJsonInvalid { reason: String },

    #[error("Marker not found in file: {marker}")]
    MarkerNotFound { marker: String },

    #[error("Invalid regex pattern: {pattern}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Failed to render template from {from} to {to}: {reason}")]
    Render {
        from: String,
        to: String,
        reason: String,
    },

    #[error("I/O error at {path}: {reason}")]
    Io { path: PathBuf, reason: String },
}

impl OperationError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::SourceNotFound { from } | Self::TemplateSourceNotFound { from } => vec![
                format!("The template references '{}' but does not ship it", from),
                "Check the \"from\" path in the template's manifest.json".into(),
            ],
            Self::DestinationExists { to } => vec![
                format!("Another operation already wrote '{}'", to),
                "Set \"overwrite\": true on the later operation if replacing is intended".into(),
            ],
            Self::TargetNotFound { target } => vec![
                format!("Nothing created '{}' before this operation ran", target),
                "Make sure the file is produced by the base or an earlier addon".into(),
            ],
            Self::MarkerNotFound { marker } => vec![
                format!("The target file does not contain '{}'", marker),
                "Check that the base template still ships the insertion marker".into(),
            ],
            Self::InvalidPattern { reason, .. } => vec![format!("Regex error: {}", reason)],
            _ => vec!["Check the template's manifest.json".into()],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Io { .. } => ErrorCategory::Internal,
            Self::SourceNotFound { .. }
            | Self::TemplateSourceNotFound { .. }
            | Self::TargetNotFound { .. } => ErrorCategory::NotFound,
            _ => ErrorCategory::Validation,
        }
    }
}
