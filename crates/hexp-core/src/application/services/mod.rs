//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "validate a plan" or "compose a project".

pub mod catalog_service;
pub mod engine;
pub mod validation;

pub use catalog_service::{CatalogService, PlannedOps, Selection};
pub use engine::Engine;
pub use validation::{ValidationResult, validate_generation_plan, validate_templates};
