//! Implementation of the `hexp list` command.

use hexp_adapters::ScanError;
use hexp_core::domain::{AddonTemplate, BaseTemplate};
use serde::Serialize;

use crate::{
    cli::{ListArgs, ListFormat, OutputFormat},
    commands::open_catalog,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// The JSON document printed by `--format json`.
#[derive(Debug, Serialize)]
struct Listing<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    bases: Option<&'a [BaseTemplate]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    addons: Option<&'a [AddonTemplate]>,
    errors: &'a [ScanError],
}

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let catalog = open_catalog(&args.catalog, &config);
    let scan = catalog.scan()?;
    tracing::debug!(
        root = %catalog.root().display(),
        bases = scan.bases.len(),
        addons = scan.addons.len(),
        errors = scan.errors.len(),
        "catalog scanned"
    );

    let bases = args.show_bases().then_some(scan.bases.as_slice());
    let addons = args.show_addons().then_some(scan.addons.as_slice());

    let format = if output.format() == OutputFormat::Json {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Json => {
            output.json(&Listing {
                bases,
                addons,
                errors: &scan.errors,
            })?;
            return Ok(());
        }

        ListFormat::List => {
            let ids = bases
                .into_iter()
                .flatten()
                .map(|b| b.id.as_str())
                .chain(addons.into_iter().flatten().map(|a| a.id.as_str()));
            for id in ids {
                output.print(id)?;
            }
        }

        ListFormat::Table => {
            if let Some(bases) = bases {
                print_bases(&output, bases)?;
            }
            if let Some(addons) = addons {
                print_addons(&output, addons)?;
            }
            if scan.bases.is_empty() && scan.addons.is_empty() {
                output.info(&format!(
                    "No templates found under {}",
                    catalog.root().join("templates").display()
                ))?;
            }
        }
    }

    for error in &scan.errors {
        output.warning(&format!("{}: {}", error.path.display(), error.error))?;
    }

    Ok(())
}

fn print_bases(output: &OutputManager, bases: &[BaseTemplate]) -> CliResult<()> {
    output.header("Base templates:")?;
    if bases.is_empty() {
        output.print("  (none)")?;
    }
    for base in bases {
        output.print(&format!("  {:<20} {}", base.id, base.description))?;
        output.field("    capabilities", &join_or_dash(&base.capabilities))?;
        if let Some(project_type) = base.project_type {
            output.field("    project type", project_type.as_str())?;
        }
    }
    output.print("")?;
    Ok(())
}

fn print_addons(output: &OutputManager, addons: &[AddonTemplate]) -> CliResult<()> {
    output.header("Addons:")?;
    if addons.is_empty() {
        output.print("  (none)")?;
    }
    for addon in addons {
        output.print(&format!("  {:<20} {}", addon.id, addon.description))?;
        output.field("    requires", &join_or_dash(&addon.requires))?;
        output.field("    provides", &join_or_dash(&addon.provides))?;
        if !addon.conflicts.is_empty() {
            output.field("    conflicts", &addon.conflicts.join(", "))?;
        }
    }
    output.print("")?;
    Ok(())
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}
