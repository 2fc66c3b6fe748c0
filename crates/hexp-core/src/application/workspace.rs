//! The output directory of one generation run.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::application::{ApplicationError, ports::Filesystem};
use crate::domain::entities::join_under;
use crate::error::{HexpError, HexpResult};

/// Output directory owned exclusively by one generation run.
///
/// The root is made absolute at construction, whether or not it exists yet.
pub struct Workspace {
    root: PathBuf,
    fs: Box<dyn Filesystem>,
}

impl Workspace {
    pub fn new(root: impl AsRef<Path>, fs: Box<dyn Filesystem>) -> HexpResult<Self> {
        let root = root.as_ref();
        let absolute = std::path::absolute(root).map_err(|e| ApplicationError::WorkspaceError {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self { root: absolute, fs })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn filesystem(&self) -> &dyn Filesystem {
        self.fs.as_ref()
    }

    /// Recursive mkdir of the root. Idempotent.
    pub fn create(&self) -> HexpResult<()> {
        debug!(root = %self.root.display(), "creating workspace");
        self.fs
            .create_dir_all(&self.root)
            .map_err(|e| self.failure("Failed to create workspace", e))
    }

    pub fn exists(&self) -> bool {
        self.fs.exists(&self.root)
    }

    /// Recursive removal of the root. A missing root is not an error.
    pub fn cleanup(&self) -> HexpResult<()> {
        if !self.exists() {
            return Ok(());
        }
        debug!(root = %self.root.display(), "removing workspace");
        self.fs
            .remove_dir_all(&self.root)
            .map_err(|e| self.failure("Failed to cleanup workspace", e))
    }

    /// Absolute path of `relative` under the root.
    pub fn resolve_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        join_under(&self.root, relative)
    }

    fn failure(&self, action: &str, cause: HexpError) -> HexpError {
        ApplicationError::WorkspaceError {
            path: self.root.clone(),
            reason: format!("{action} at {}: {cause}", self.root.display()),
        }
        .into()
    }
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace").field("root", &self.root).finish_non_exhaustive()
    }
}
