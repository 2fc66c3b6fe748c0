//! Command handlers, one module per subcommand.

use std::path::PathBuf;

use hexp_adapters::Catalog;
use hexp_core::{
    application::{CatalogService, PlannedOps, Selection, ValidationResult, validate_generation_plan},
    domain::TemplateOps,
};

use crate::{cli::CatalogArgs, config::AppConfig, error::CliResult};

pub mod completions;
pub mod config;
pub mod create;
pub mod init;
pub mod list;
pub mod validate;

/// `--templates` wins over `templates.dir`.
pub(crate) fn templates_root(args: &CatalogArgs, config: &AppConfig) -> PathBuf {
    args.templates
        .clone()
        .unwrap_or_else(|| config.templates.dir.clone())
}

/// Open the catalog rooted at [`templates_root`].
pub(crate) fn open_catalog(args: &CatalogArgs, config: &AppConfig) -> Catalog {
    Catalog::new(templates_root(args, config))
}

/// Catalog service over [`open_catalog`].
pub(crate) fn catalog_service(args: &CatalogArgs, config: &AppConfig) -> CatalogService {
    CatalogService::new(Box::new(open_catalog(args, config)))
}

/// A selection checked by every plan stage, ready to execute when valid.
pub(crate) struct Plan {
    pub selection: Selection,
    pub ops: PlannedOps,
    /// `warnings` also carries unknown addons and skipped directories.
    pub validation: ValidationResult,
}

impl Plan {
    /// Addon operation lists in resolved dependency order.
    pub fn ordered_addon_ops(&self) -> Vec<TemplateOps> {
        self.validation
            .ordered_addons()
            .iter()
            .filter_map(|addon| self.ops.addons.iter().find(|ops| ops.id == addon.id))
            .cloned()
            .collect()
    }
}

/// Select templates and run the plan checks. Nothing is written.
pub(crate) fn build_plan(
    service: &CatalogService,
    base_id: &str,
    addon_ids: &[String],
) -> CliResult<Plan> {
    let selection = service.select(base_id, addon_ids)?;
    let ops = service.template_ops(&selection.base, &selection.addons)?;
    let mut validation =
        validate_generation_plan(&selection.base, &selection.addons, &ops.base, &ops.addons);

    let mut warnings: Vec<String> = selection
        .unknown_addons
        .iter()
        .map(|id| format!("Unknown addon '{id}' was ignored"))
        .collect();
    warnings.extend(ops.warnings.iter().cloned());
    warnings.append(&mut validation.warnings);
    validation.warnings = warnings;

    Ok(Plan {
        selection,
        ops,
        validation,
    })
}
