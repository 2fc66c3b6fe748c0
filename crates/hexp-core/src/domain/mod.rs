// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for hexp.
//!
//! Pure composition logic: template model, manifest rules, JSON deep merge,
//! and the four plan checks. Nothing here touches the filesystem; I/O is
//! reached through the ports defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable entities**: Templates are Clone + PartialEq value objects
//! - **Deterministic**: Every check returns the same result for the same input
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod json_merge;
pub mod plan;

mod validation;

// Re-exports for convenience
pub use entities::{
    AddonTemplate, ArrayMergeStrategy, BaseTemplate, Capability, CopyOperation, ExecutionContext,
    InsertPosition, JsonMergeOperation, Manifest, Operation, OperationKind, OperationResult,
    ProjectType, Prompt, PromptOption, PromptType, TemplateKind, TemplateOps,
    TemplateRenderOperation, TextInsertOperation, TextReplaceOperation, Variables,
};

pub use error::{DomainError, ErrorCategory};

pub use plan::{
    CollisionInfo, CollisionResult, CompatibilityChecker, CompatibilityResult, ConflictDetector,
    ConflictInfo, ConflictResult, DependencyResolver, FileCollisionDetector, ResolvedOrder,
};

pub use validation::DomainValidator;
