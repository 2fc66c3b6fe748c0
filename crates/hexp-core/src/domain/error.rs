// ============================================================================
// domain/error.rs - MANIFEST AND MODEL ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel inside scan reports)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Manifest Validation
    // ========================================================================
    #[error("Invalid template id '{id}': must be kebab-case (lowercase letters, digits, single hyphens)")]
    InvalidTemplateId { id: String },

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Base template '{template_id}' must declare at least one capability")]
    NoCapabilities { template_id: String },

    #[error("Addon '{template_id}' must declare at least one of requires, provides, or conflicts")]
    InertAddon { template_id: String },

    #[error("Template '{template_id}' declares prompt '{prompt_id}' more than once")]
    DuplicatePrompt {
        template_id: String,
        prompt_id: String,
    },

    #[error("Prompt '{prompt_id}' in template '{template_id}' needs at least one option")]
    PromptWithoutOptions {
        template_id: String,
        prompt_id: String,
    },

    #[error("Invalid value '{value}' for {field}")]
    InvalidValue { field: &'static str, value: String },

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    // ========================================================================
    // Lookup
    // ========================================================================
    #[error("No {kind} template with id '{id}'")]
    TemplateNotFound { kind: &'static str, id: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidTemplateId { id } => vec![
                format!("'{}' is not a valid template id", id),
                "Use lowercase letters and digits separated by single hyphens".into(),
                "Examples: next-app, auth-clerk, prisma".into(),
            ],
            Self::NoCapabilities { template_id } => vec![
                format!("Add a \"capabilities\" array to the manifest of '{}'", template_id),
                "A base must provide something addons can build on".into(),
            ],
            Self::InertAddon { template_id } => vec![
                format!("Addon '{}' has nothing to compose with", template_id),
                "Declare \"requires\", \"provides\", or \"conflicts\" in its manifest".into(),
            ],
            Self::TemplateNotFound { id, .. } => vec![
                format!("No template found with id: {}", id),
                "Try: hexp list".into(),
            ],
            Self::InvalidManifest(msg) => vec![
                "Check the manifest.json against the documented format".into(),
                format!("Details: {}", msg),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            _ => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
}
