use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use super::operation::Operation;

/// Template variables, keyed by name.
pub type Variables = Map<String, Value>;

/// Everything an executor needs besides the filesystem.
///
/// `template_root` is swapped per template being applied; `workspace_root`
/// stays fixed for the whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionContext {
    pub variables: Variables,
    pub template_root: PathBuf,
    pub workspace_root: PathBuf,
}

impl ExecutionContext {
    pub fn new(
        variables: Variables,
        template_root: impl Into<PathBuf>,
        workspace_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            variables,
            template_root: template_root.into(),
            workspace_root: workspace_root.into(),
        }
    }

    /// Same variables and workspace, different template directory.
    pub fn for_template(&self, template_root: impl Into<PathBuf>) -> Self {
        Self {
            variables: self.variables.clone(),
            template_root: template_root.into(),
            workspace_root: self.workspace_root.clone(),
        }
    }

    /// Resolve a manifest `from` path against the template directory.
    pub fn resolve_source(&self, relative: &str) -> PathBuf {
        join_under(&self.template_root, relative)
    }

    /// Resolve a manifest `to`/`target` path against the workspace.
    pub fn resolve_destination(&self, relative: &str) -> PathBuf {
        join_under(&self.workspace_root, relative)
    }
}

/// Join `relative` onto `root` so the result always stays under `root`.
///
/// Root and prefix components are dropped, and `..` only climbs back out of
/// segments that `relative` itself added.
pub fn join_under(root: &Path, relative: impl AsRef<Path>) -> PathBuf {
    let mut joined = root.to_path_buf();
    for part in clamped_parts(relative.as_ref()) {
        joined.push(part);
    }
    joined
}

/// Canonical spelling of a workspace-relative destination, used as the
/// grouping key for collision detection (`./a//b` and `a/b` are the same file).
pub fn normalize_destination(relative: &str) -> String {
    clamped_parts(Path::new(relative))
        .iter()
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Normal components of `relative` with `..` applied, never rising above
/// the starting directory.
fn clamped_parts(relative: &Path) -> Vec<&OsStr> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::ParentDir => {
                parts.pop();
            }
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
        }
    }
    parts
}

/// Outcome of one executed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files_affected: Vec<String>,
}

impl OperationResult {
    pub fn succeeded(files_affected: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            success: true,
            error: None,
            files_affected: files_affected.into_iter().map(Into::into).collect(),
        }
    }
}

/// A template directory paired with the operations to run from it.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateOps {
    /// Template id, used in error context and collision reports.
    pub id: String,
    pub template_dir: PathBuf,
    pub ops: Vec<Operation>,
}

impl TemplateOps {
    pub fn new(id: impl Into<String>, template_dir: impl Into<PathBuf>, ops: Vec<Operation>) -> Self {
        Self {
            id: id.into(),
            template_dir: template_dir.into(),
            ops,
        }
    }

    /// Label identifying where an operation came from: the template
    /// directory when known, the template id otherwise.
    pub fn source_label(&self) -> String {
        if self.template_dir.as_os_str().is_empty() {
            self.id.clone()
        } else {
            self.template_dir.display().to_string()
        }
    }
}
