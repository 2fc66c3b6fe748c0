//! hexp core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the hexp
//! template composer, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             hexp-cli (CLI)              │
//! │      (create, list, validate, ...)      │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (validate_generation_plan, Engine,      │
//! │  CatalogService, Workspace)             │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │ (Filesystem, TemplateRenderer, Catalog) │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     hexp-adapters (Infrastructure)      │
//! │ (LocalFilesystem, MustacheRenderer, ...)│
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ (templates, operations, plan checks)    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hexp_core::prelude::*;
//!
//! # fn run(base: BaseTemplate, addons: Vec<AddonTemplate>, engine: Engine,
//! #        base_ops: TemplateOps, addon_ops: Vec<TemplateOps>) -> HexpResult<()> {
//! // 1. Plan: every check runs, nothing is written
//! let plan = validate_generation_plan(&base, &addons, &base_ops, &addon_ops);
//! if !plan.is_valid {
//!     for error in &plan.errors {
//!         eprintln!("{error}");
//!     }
//!     return Ok(());
//! }
//!
//! // 2. Execute in the resolved order
//! let results = engine.compose(&base_ops, &addon_ops)?;
//! println!("{} operations applied", results.len());
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CatalogService, Engine, ValidationResult, Workspace,
        ports::{Filesystem, TemplateCatalog, TemplateRenderer},
        validate_generation_plan, validate_templates,
    };
    pub use crate::domain::{
        AddonTemplate, BaseTemplate, Capability, ExecutionContext, Manifest, Operation,
        OperationResult, ProjectType, TemplateKind, TemplateOps, Variables,
    };
    pub use crate::error::{HexpError, HexpResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
