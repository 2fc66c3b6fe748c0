//! Template manifests: bases, addons, and their prompts.
//!
//! A generation run composes exactly one [`BaseTemplate`] with zero or more
//! [`AddonTemplate`]s. Both are plain value objects decoded from
//! `manifest.json` files and never mutated afterwards.
//!
//! ## Capability model
//!
//! ```text
//! BaseTemplate ── capabilities ──┐
//!                                ├──► satisfies ──► AddonTemplate.requires
//! AddonTemplate ── provides ─────┘
//!
//! AddonTemplate.conflicts ──► other addon *ids* (not capabilities)
//! ```
//!
//! Absent collections in a manifest decode as empty vectors, so the plan
//! checks never have to special-case missing fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::operation::Operation;
use crate::domain::DomainError;

/// An opaque feature token such as `"web-server"` or `"orm"`.
///
/// Compared with case-sensitive string equality.
pub type Capability = String;

// ============================================================================
// Enumerations
// ============================================================================

/// Layout of the generated project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Monorepo,
    Single,
}

impl ProjectType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monorepo => "monorepo",
            Self::Single => "single",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monorepo" => Ok(Self::Monorepo),
            "single" => Ok(Self::Single),
            other => Err(DomainError::InvalidValue {
                field: "projectType",
                value: other.to_string(),
            }),
        }
    }
}

/// Which half of the composition a template belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Base,
    Addon,
}

impl TemplateKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Addon => "addon",
        }
    }

    /// Folder under `templates/` holding templates of this kind.
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Base => "bases",
            Self::Addon => "addons",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Prompts
// ============================================================================

/// Input widget a prompt asks the user to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptType {
    Text,
    Select,
    Confirm,
    Multiselect,
}

/// One choice of a `select`/`multiselect` prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptOption {
    pub label: String,
    pub value: String,
}

/// A variable the template would like the user to supply.
///
/// Interactive collection is out of this crate's hands; callers use
/// [`Prompt::default`] to fill variables that were not given explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: PromptType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<PromptOption>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<String>,
}

// ============================================================================
// Base template
// ============================================================================

/// The foundational project skeleton. Always applied first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<ProjectType>,
    #[serde(default)]
    pub capabilities: Vec<Capability>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prompts: Vec<Prompt>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ops: Vec<Operation>,
}

impl BaseTemplate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            project_type: None,
            capabilities: Vec::new(),
            prompts: Vec::new(),
            ops: Vec::new(),
        }
    }

    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Capability>,
    {
        self.capabilities = capabilities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_project_type(mut self, project_type: ProjectType) -> Self {
        self.project_type = Some(project_type);
        self
    }

    pub fn with_prompt(mut self, prompt: Prompt) -> Self {
        self.prompts.push(prompt);
        self
    }

    pub fn with_op(mut self, op: impl Into<Operation>) -> Self {
        self.ops.push(op.into());
        self
    }

    /// `true` if the base unconditionally provides `capability`.
    pub fn provides(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }
}

// ============================================================================
// Addon template
// ============================================================================

/// An optional, composable augmentation of a base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<Capability>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provides: Vec<Capability>,
    /// Addon ids this addon refuses to be combined with.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prompts: Vec<Prompt>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ops: Vec<Operation>,
}

impl AddonTemplate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            requires: Vec::new(),
            provides: Vec::new(),
            conflicts: Vec::new(),
            prompts: Vec::new(),
            ops: Vec::new(),
        }
    }

    pub fn requiring<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Capability>,
    {
        self.requires = capabilities.into_iter().map(Into::into).collect();
        self
    }

    pub fn providing<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Capability>,
    {
        self.provides = capabilities.into_iter().map(Into::into).collect();
        self
    }

    pub fn conflicting_with<I, S>(mut self, addon_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conflicts = addon_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_prompt(mut self, prompt: Prompt) -> Self {
        self.prompts.push(prompt);
        self
    }

    pub fn with_op(mut self, op: impl Into<Operation>) -> Self {
        self.ops.push(op.into());
        self
    }

    pub fn provides_capability(&self, capability: &str) -> bool {
        self.provides.iter().any(|c| c == capability)
    }

    /// `true` if this addon declares a conflict with `addon_id`.
    pub fn conflicts_with(&self, addon_id: &str) -> bool {
        self.conflicts.iter().any(|c| c == addon_id)
    }
}

// ============================================================================
// Manifest
// ============================================================================

/// A decoded `manifest.json`, discriminated by its `"type"` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Manifest {
    Base(BaseTemplate),
    Addon(AddonTemplate),
}

impl Manifest {
    pub fn id(&self) -> &str {
        match self {
            Self::Base(base) => &base.id,
            Self::Addon(addon) => &addon.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Base(base) => &base.name,
            Self::Addon(addon) => &addon.name,
        }
    }

    pub fn kind(&self) -> TemplateKind {
        match self {
            Self::Base(_) => TemplateKind::Base,
            Self::Addon(_) => TemplateKind::Addon,
        }
    }

    pub fn prompts(&self) -> &[Prompt] {
        match self {
            Self::Base(base) => &base.prompts,
            Self::Addon(addon) => &addon.prompts,
        }
    }

    pub fn ops(&self) -> &[Operation] {
        match self {
            Self::Base(base) => &base.ops,
            Self::Addon(addon) => &addon.ops,
        }
    }
}

impl From<BaseTemplate> for Manifest {
    fn from(base: BaseTemplate) -> Self {
        Self::Base(base)
    }
}

impl From<AddonTemplate> for Manifest {
    fn from(addon: AddonTemplate) -> Self {
        Self::Addon(addon)
    }
}
