//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `hexp-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::{AddonTemplate, BaseTemplate, TemplateKind, Variables};
use crate::error::HexpResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `hexp_adapters::filesystem::LocalFilesystem` (production)
/// - `hexp_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - Paths handed to the port are already resolved against the template
///   directory or the workspace root
/// - `write_file` and `copy_file` do not create parent directories; callers
///   do that explicitly
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> HexpResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> HexpResult<()>;

    /// Read a UTF-8 file.
    fn read_to_string(&self, path: &Path) -> HexpResult<String>;

    /// Write content to a file, replacing any existing content.
    fn write_file(&self, path: &Path, content: &str) -> HexpResult<()>;

    /// Copy a file byte-for-byte.
    fn copy_file(&self, from: &Path, to: &Path) -> HexpResult<()>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `hexp_adapters::renderer::MustacheRenderer` (handlebars in mustache mode)
///
/// Missing variables render as an empty string, never as an error.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template: &str, variables: &Variables) -> HexpResult<String>;
}

/// Port for template discovery.
///
/// Implemented by:
/// - `hexp_adapters::catalog::Catalog` (scans `templates/` on disk, cached)
pub trait TemplateCatalog: Send + Sync {
    /// All valid base templates, sorted by id.
    fn bases(&self) -> HexpResult<Vec<BaseTemplate>>;

    /// All valid addon templates, sorted by id.
    fn addons(&self) -> HexpResult<Vec<AddonTemplate>>;

    /// On-disk directory of a template, if it exists.
    fn template_dir(&self, kind: TemplateKind, id: &str) -> Option<PathBuf>;
}

impl<T: TemplateCatalog + ?Sized> TemplateCatalog for std::sync::Arc<T> {
    fn bases(&self) -> HexpResult<Vec<BaseTemplate>> {
        (**self).bases()
    }

    fn addons(&self) -> HexpResult<Vec<AddonTemplate>> {
        (**self).addons()
    }

    fn template_dir(&self, kind: TemplateKind, id: &str) -> Option<PathBuf> {
        (**self).template_dir(kind, id)
    }
}
