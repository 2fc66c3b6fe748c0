//! Infrastructure adapters for hexp.
//!
//! This crate implements the ports defined in `hexp_core::application::ports`.
//! It contains all external dependencies and I/O operations.

use std::path::Path;

use hexp_core::{
    application::{Engine, Workspace},
    domain::ExecutionContext,
    error::HexpResult,
};

pub mod catalog;
pub mod filesystem;
pub mod manifest;
pub mod renderer;

// Re-export commonly used adapters
pub use catalog::{Catalog, CatalogScan, ScanError, TemplateScanner};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use manifest::{MANIFEST_FILE, ManifestError, ManifestLoader};
pub use renderer::MustacheRenderer;

/// A workspace at `path` backed by the local filesystem.
pub fn create_workspace(path: impl AsRef<Path>) -> HexpResult<Workspace> {
    Workspace::new(path, Box::new(LocalFilesystem::new()))
}

/// An engine over `workspace` using the mustache renderer.
pub fn create_engine(workspace: Workspace, context: ExecutionContext) -> Engine {
    Engine::new(workspace, context, Box::new(MustacheRenderer::new()))
}
