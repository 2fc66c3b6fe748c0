pub mod context;
pub mod operation;
pub mod template;

pub use context::{
    ExecutionContext, OperationResult, TemplateOps, Variables, join_under, normalize_destination,
};
pub use operation::{
    ArrayMergeStrategy, CopyOperation, InsertPosition, JsonMergeOperation, Operation,
    OperationKind, TemplateRenderOperation, TextInsertOperation, TextReplaceOperation,
};
pub use template::{
    AddonTemplate, BaseTemplate, Capability, Manifest, ProjectType, Prompt, PromptOption,
    PromptType, TemplateKind,
};
