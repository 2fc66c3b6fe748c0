//! Application layer for hexp.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (validation, Engine, CatalogService)
//! - **Operations**: The five file-operation executors
//! - **Workspace**: The output directory of a run
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! composition rules itself. Those live in `crate::domain`.

pub mod error;
pub mod operations;
pub mod ports;
pub mod services;
pub mod workspace;

pub use services::{
    CatalogService, Engine, PlannedOps, Selection, ValidationResult, validate_generation_plan,
    validate_templates,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, TemplateCatalog, TemplateRenderer};

pub use error::{ApplicationError, OperationError, Stage};
pub use workspace::Workspace;
