//! Engine - applies a validated plan to a workspace.
//!
//! The engine runs strictly sequentially:
//! 1. Create the workspace if it does not exist
//! 2. Apply every base operation in list order
//! 3. Apply each addon's operations in the order given
//!
//! The first failing operation aborts the run. Nothing is rolled back; the
//! caller decides whether to [`Workspace::cleanup`] the partial output.

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError, Workspace,
        error::Stage,
        operations::execute_operation,
        ports::TemplateRenderer,
    },
    domain::{ExecutionContext, OperationResult, TemplateOps},
    error::HexpResult,
};

/// Sequential operation executor bound to one workspace.
pub struct Engine {
    workspace: Workspace,
    context: ExecutionContext,
    renderer: Box<dyn TemplateRenderer>,
}

impl Engine {
    /// Create an engine. The context's workspace root is pinned to the
    /// workspace's absolute root.
    pub fn new(
        workspace: Workspace,
        mut context: ExecutionContext,
        renderer: Box<dyn TemplateRenderer>,
    ) -> Self {
        context.workspace_root = workspace.root().to_path_buf();
        Self {
            workspace,
            context,
            renderer,
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    /// Apply the base template, then every addon in the order given.
    #[instrument(skip_all, fields(base = %base.id, addons = addons.len()))]
    pub fn compose(&self, base: &TemplateOps, addons: &[TemplateOps]) -> HexpResult<Vec<OperationResult>> {
        if !self.workspace.exists() {
            self.workspace.create()?;
        }

        let mut results = self.apply_base(base)?;
        for addon in addons {
            results.extend(self.apply_addon(addon)?);
        }

        info!(operations = results.len(), "composition complete");
        Ok(results)
    }

    pub fn apply_base(&self, base: &TemplateOps) -> HexpResult<Vec<OperationResult>> {
        self.apply(base, Stage::Base)
    }

    pub fn apply_addon(&self, addon: &TemplateOps) -> HexpResult<Vec<OperationResult>> {
        self.apply(addon, Stage::Addon(addon.id.clone()))
    }

    fn apply(&self, template: &TemplateOps, stage: Stage) -> HexpResult<Vec<OperationResult>> {
        info!(%stage, operations = template.ops.len(), "applying template");
        let context = self.context.for_template(&template.template_dir);
        let fs = self.workspace.filesystem();

        let mut results = Vec::with_capacity(template.ops.len());
        for operation in &template.ops {
            debug!(kind = %operation.kind(), destination = operation.destination(), "executing");
            let result = execute_operation(operation, &context, fs, self.renderer.as_ref()).map_err(
                |source| ApplicationError::OperationFailed {
                    stage: stage.clone(),
                    operation: Box::new(operation.clone()),
                    source,
                },
            )?;
            results.push(result);
        }
        Ok(results)
    }
}
