//! `hexp validate`: run the plan checks without writing anything.

use hexp_core::application::ValidationResult;

use crate::{
    cli::{OutputFormat, ReportFormat, ValidateArgs},
    commands::{build_plan, catalog_service},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(args: ValidateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = catalog_service(&args.catalog, &config);
    let plan = build_plan(&service, &args.base, &args.addons)?;
    let result = &plan.validation;

    if args.format == ReportFormat::Json || output.format() == OutputFormat::Json {
        output.json(result)?;
    } else {
        output.header(&format!(
            "Plan for '{}' with {} addon(s)",
            plan.selection.base.id,
            plan.selection.addons.len()
        ))?;
        for line in stage_summary(result) {
            output.print(&line)?;
        }
        for warning in &result.warnings {
            output.warning(warning)?;
        }
        if result.is_valid {
            output.success("Plan is valid")?;
        }
    }

    if result.is_valid {
        Ok(())
    } else {
        Err(CliError::PlanRejected {
            errors: result.errors.clone(),
        })
    }
}

/// One line per check, in the order the checks run.
pub(crate) fn stage_summary(result: &ValidationResult) -> Vec<String> {
    let mut lines = Vec::with_capacity(5);

    let missing = result.compatibility.missing_capabilities.len();
    lines.push(status_line(
        "compatibility",
        missing == 0,
        format!("{missing} addon(s) with missing capabilities"),
    ));

    let conflicts = result.conflicts.conflicts.len();
    lines.push(status_line(
        "conflicts",
        conflicts == 0,
        format!("{conflicts} conflicting pair(s)"),
    ));

    let cycles = result.dependencies.cycles.len();
    lines.push(status_line(
        "dependencies",
        !result.dependencies.has_cycles,
        format!("{cycles} cycle(s)"),
    ));

    let collisions = result.collisions.collisions.len();
    lines.push(status_line(
        "collisions",
        !result.collisions.has_collisions,
        format!("{collisions} file(s) written by more than one template"),
    ));

    let order: Vec<&str> = result
        .ordered_addons()
        .iter()
        .map(|addon| addon.id.as_str())
        .collect();
    if !order.is_empty() {
        lines.push(format!("  {:<14} {}", "order", order.join(" -> ")));
    }

    lines
}

fn status_line(stage: &str, ok: bool, problem: String) -> String {
    if ok {
        format!("  {stage:<14} ok")
    } else {
        format!("  {stage:<14} {problem}")
    }
}
