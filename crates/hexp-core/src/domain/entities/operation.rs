//! The closed set of declarative file operations.
//!
//! Operations are inert data until the engine executes them. Every variant
//! writes exactly one destination path, which the collision detector reads
//! through [`Operation::destination`] without touching the filesystem.
//!
//! On the wire an operation is a JSON object tagged by `"type"`:
//!
//! ```json
//! { "type": "copy", "from": "files/.gitignore", "to": ".gitignore" }
//! { "type": "jsonMerge", "target": "package.json", "data": { "private": true }, "arrayMerge": "append" }
//! { "type": "textInsert", "target": "src/main.ts", "marker": "// routes", "content": "app.use(x)\n" }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

fn is_false(value: &bool) -> bool {
    !*value
}

/// One declarative file-mutation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Operation {
    Copy(CopyOperation),
    TemplateRender(TemplateRenderOperation),
    JsonMerge(JsonMergeOperation),
    TextInsert(TextInsertOperation),
    TextReplace(TextReplaceOperation),
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Copy(_) => OperationKind::Copy,
            Self::TemplateRender(_) => OperationKind::TemplateRender,
            Self::JsonMerge(_) => OperationKind::JsonMerge,
            Self::TextInsert(_) => OperationKind::TextInsert,
            Self::TextReplace(_) => OperationKind::TextReplace,
        }
    }

    /// Workspace-relative path this operation writes.
    pub fn destination(&self) -> &str {
        match self {
            Self::Copy(op) => &op.to,
            Self::TemplateRender(op) => &op.to,
            Self::JsonMerge(op) => &op.target,
            Self::TextInsert(op) => &op.target,
            Self::TextReplace(op) => &op.target,
        }
    }

    /// `true` when the operation carries an explicit `overwrite: true`.
    pub fn allows_overwrite(&self) -> bool {
        match self {
            Self::Copy(op) => op.overwrite,
            Self::JsonMerge(op) => op.overwrite,
            Self::TemplateRender(_) | Self::TextInsert(_) | Self::TextReplace(_) => false,
        }
    }

    pub fn copy(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::Copy(CopyOperation::new(from, to))
    }

    pub fn template_render(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::TemplateRender(TemplateRenderOperation {
            from: from.into(),
            to: to.into(),
        })
    }

    pub fn json_merge(target: impl Into<String>, data: Value) -> Self {
        Self::JsonMerge(JsonMergeOperation::new(target, data))
    }

    pub fn text_insert(
        target: impl Into<String>,
        marker: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::TextInsert(TextInsertOperation::new(target, marker, content))
    }

    pub fn text_replace(
        target: impl Into<String>,
        pattern: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self::TextReplace(TextReplaceOperation::new(target, pattern, replacement))
    }
}

/// Discriminant of [`Operation`], displayed with its manifest spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    Copy,
    TemplateRender,
    JsonMerge,
    TextInsert,
    TextReplace,
}

impl OperationKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::TemplateRender => "templateRender",
            Self::JsonMerge => "jsonMerge",
            Self::TextInsert => "textInsert",
            Self::TextReplace => "textReplace",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── copy ──────────────────────────────────────────────────────────────────────

/// Byte-for-byte copy from the template directory into the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyOperation {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub overwrite: bool,
}

impl CopyOperation {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            overwrite: false,
        }
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

// ── templateRender ────────────────────────────────────────────────────────────

/// Render a mustache-family template with the run's variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRenderOperation {
    pub from: String,
    pub to: String,
}

// ── jsonMerge ─────────────────────────────────────────────────────────────────

/// How arrays are combined when both sides of a JSON merge hold one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayMergeStrategy {
    /// Destination elements followed by source elements.
    #[default]
    Append,
    /// Source array wins outright.
    Replace,
    /// Element-wise merge; see [`crate::domain::json_merge`].
    Merge,
}

/// Deep-merge `data` into a JSON file in the workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonMergeOperation {
    pub target: String,
    pub data: Value,
    #[serde(default)]
    pub array_merge: ArrayMergeStrategy,
    #[serde(default, skip_serializing_if = "is_false")]
    pub overwrite: bool,
}

impl JsonMergeOperation {
    pub fn new(target: impl Into<String>, data: Value) -> Self {
        Self {
            target: target.into(),
            data,
            array_merge: ArrayMergeStrategy::default(),
            overwrite: false,
        }
    }

    pub fn array_merge(mut self, strategy: ArrayMergeStrategy) -> Self {
        self.array_merge = strategy;
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

// ── textInsert ────────────────────────────────────────────────────────────────

/// Side of the marker that receives inserted content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertPosition {
    Before,
    #[default]
    After,
}

/// Splice `content` next to the first occurrence of `marker`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextInsertOperation {
    pub target: String,
    pub marker: String,
    pub content: String,
    #[serde(default)]
    pub position: InsertPosition,
}

impl TextInsertOperation {
    pub fn new(
        target: impl Into<String>,
        marker: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            marker: marker.into(),
            content: content.into(),
            position: InsertPosition::default(),
        }
    }

    pub fn position(mut self, position: InsertPosition) -> Self {
        self.position = position;
        self
    }
}

// ── textReplace ───────────────────────────────────────────────────────────────

/// Replace every occurrence of `pattern`, literally or as a regex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextReplaceOperation {
    pub target: String,
    pub pattern: String,
    pub replacement: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_regex: bool,
}

impl TextReplaceOperation {
    pub fn new(
        target: impl Into<String>,
        pattern: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            pattern: pattern.into(),
            replacement: replacement.into(),
            is_regex: false,
        }
    }

    pub fn regex(mut self, is_regex: bool) -> Self {
        self.is_regex = is_regex;
        self
    }
}

macro_rules! impl_into_operation {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Operation {
                fn from(op: $ty) -> Self {
                    Operation::$variant(op)
                }
            }
        )*
    };
}

impl_into_operation! {
    CopyOperation => Copy,
    TemplateRenderOperation => TemplateRender,
    JsonMergeOperation => JsonMerge,
    TextInsertOperation => TextInsert,
    TextReplaceOperation => TextReplace,
}
