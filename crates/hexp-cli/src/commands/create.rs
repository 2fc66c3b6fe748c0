//! `hexp create`: plan, then compose a project from a base and addons.

use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use hexp_adapters::{create_engine, create_workspace};
use hexp_core::{
    application::CatalogService,
    domain::{ExecutionContext, ProjectType, Variables},
};

use crate::{
    cli::{CreateArgs, OutputFormat},
    commands::{Plan, build_plan, open_catalog},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

// ── Generation settings file ──────────────────────────────────────────────────

/// Contents of the `--from` file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationFile {
    pub base: Option<String>,
    pub addons: Option<Vec<String>>,
    pub name: Option<String>,
    pub monorepo: Option<bool>,
    pub single: Option<bool>,
    pub output: Option<PathBuf>,
    pub variables: Variables,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Yaml,
    Toml,
    Auto,
}

impl FileFormat {
    fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Self::Json,
            Some("yaml" | "yml") => Self::Yaml,
            Some("toml") => Self::Toml,
            _ => Self::Auto,
        }
    }

    /// YAML when the text starts a document or looks like `key: value`
    /// outside a JSON object or array; JSON otherwise.
    fn sniff(content: &str) -> Self {
        let trimmed = content.trim();
        let looks_like_yaml = trimmed.starts_with("---")
            || (trimmed.contains(':') && !trimmed.starts_with('{') && !trimmed.starts_with('['));
        if looks_like_yaml { Self::Yaml } else { Self::Json }
    }
}

impl GenerationFile {
    /// Read and check a generation settings file.
    pub fn load(path: &Path) -> CliResult<Self> {
        let fail = |reason: String| CliError::GenerationFile {
            path: path.to_path_buf(),
            reason,
        };

        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => fail(format!("Config file not found: {}", path.display())),
            _ => fail(e.to_string()),
        })?;

        let file = Self::parse(&content, FileFormat::from_path(path)).map_err(fail)?;
        info!(path = %path.display(), "generation settings loaded");
        Ok(file)
    }

    fn parse(content: &str, format: FileFormat) -> Result<Self, String> {
        let format = match format {
            FileFormat::Auto => FileFormat::sniff(content),
            known => known,
        };

        let raw: Value = match format {
            FileFormat::Json | FileFormat::Auto => serde_json::from_str(content)
                .map_err(|e| format!("Invalid JSON in config file: {e}"))?,
            FileFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| format!("Invalid YAML in config file: {e}"))?,
            FileFormat::Toml => {
                toml::from_str(content).map_err(|e| format!("Invalid TOML in config file: {e}"))?
            }
        };

        // An empty YAML document is an empty settings file.
        let raw = if raw.is_null() { Value::Object(Variables::new()) } else { raw };

        let file: Self =
            serde_json::from_value(raw).map_err(|e| format!("Config validation failed: {e}"))?;
        file.check()
            .map_err(|e| format!("Config validation failed: {e}"))?;
        Ok(file)
    }

    fn check(&self) -> Result<(), String> {
        if self.base.as_deref().is_some_and(str::is_empty) {
            return Err("base: must not be empty".into());
        }
        if self.name.as_deref().is_some_and(str::is_empty) {
            return Err("name: must not be empty".into());
        }
        Ok(())
    }
}

// ── Request ───────────────────────────────────────────────────────────────────

/// Command-line flags merged over the settings file.
#[derive(Debug, Clone, PartialEq)]
struct Request {
    base: Option<String>,
    addons: Vec<String>,
    name: Option<String>,
    project_type: Option<ProjectType>,
    output: PathBuf,
    /// File variables with `--var` values on top.
    variables: Variables,
}

impl Request {
    fn merge(args: &CreateArgs, file: GenerationFile) -> Self {
        let project_type = if args.monorepo {
            Some(ProjectType::Monorepo)
        } else if args.single {
            Some(ProjectType::Single)
        } else if file.monorepo == Some(true) {
            Some(ProjectType::Monorepo)
        } else if file.single == Some(true) {
            Some(ProjectType::Single)
        } else {
            None
        };

        let mut variables = file.variables;
        for (key, value) in &args.vars {
            variables.insert(key.clone(), value.clone());
        }

        Self {
            base: args.base.clone().or(file.base),
            addons: args.addons.clone().or(file.addons).unwrap_or_default(),
            name: args.name.clone().or(file.name),
            project_type,
            output: args
                .output
                .clone()
                .or(file.output)
                .unwrap_or_else(|| PathBuf::from(".")),
            variables,
        }
    }
}

/// Lowercase letters, digits and hyphens; not empty.
pub fn validate_project_name(name: &str) -> CliResult<()> {
    static NAME: OnceLock<Regex> = OnceLock::new();
    let pattern = NAME.get_or_init(|| Regex::new(r"^[a-z0-9-]+$").expect("project name regex is valid"));

    let reason = if name.trim().is_empty() {
        "Project name cannot be empty"
    } else if !pattern.is_match(name) {
        "Project name must contain only lowercase letters, numbers, and hyphens"
    } else {
        return Ok(());
    };

    Err(CliError::InvalidProjectName {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}

// ── Dry run report ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DryRun<'a> {
    base: TemplateSummary<'a>,
    addons: Vec<TemplateSummary<'a>>,
    project_name: &'a str,
    project_type: ProjectType,
    output: &'a Path,
    variables: &'a Variables,
    warnings: &'a [String],
}

#[derive(Debug, Serialize)]
struct TemplateSummary<'a> {
    id: &'a str,
    name: &'a str,
    operations: usize,
}

// ── Command ───────────────────────────────────────────────────────────────────

pub fn execute(args: CreateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let run_id = Uuid::new_v4();
    let span = info_span!("create", %run_id);
    let _guard = span.enter();

    let file = match &args.from {
        Some(path) => GenerationFile::load(path)?,
        None => GenerationFile::default(),
    };
    let request = Request::merge(&args, file);

    let name = request.name.clone().ok_or_else(|| CliError::InvalidInput {
        message: "--name is required".into(),
    })?;
    validate_project_name(&name)?;
    let base_id = request.base.clone().ok_or_else(|| CliError::InvalidInput {
        message: "--base is required".into(),
    })?;

    let catalog = open_catalog(&args.catalog, &config);
    let templates_root = catalog.root().to_path_buf();
    let service = CatalogService::new(Box::new(catalog));
    if service.bases()?.is_empty() {
        return Err(CliError::NoTemplates {
            root: templates_root,
        });
    }

    let plan = build_plan(&service, &base_id, &request.addons)?;
    for warning in &plan.validation.warnings {
        output.warning(warning)?;
    }
    if !plan.validation.is_valid {
        return Err(CliError::PlanRejected {
            errors: plan.validation.errors.clone(),
        });
    }

    let project_type = resolve_project_type(&request, &plan, &config)?;
    let variables = build_variables(&plan, &request, &name, project_type);
    let project_dir = request.output.join(&name);

    if args.dry_run {
        if project_dir.exists() {
            output.warning(&format!("Directory {} already exists", project_dir.display()))?;
        }
        let report = DryRun {
            base: summarize(&plan.selection.base.id, &plan.selection.base.name, plan.ops.base.ops.len()),
            addons: plan
                .ordered_addon_ops()
                .iter()
                .filter_map(|ops| {
                    let addon = plan.selection.addons.iter().find(|a| a.id == ops.id)?;
                    Some(summarize(&addon.id, &addon.name, ops.ops.len()))
                })
                .collect(),
            project_name: &name,
            project_type,
            output: &project_dir,
            variables: &variables,
            warnings: &plan.validation.warnings,
        };
        return print_dry_run(&output, &report);
    }

    if project_dir.exists() {
        return Err(CliError::ProjectExists { path: project_dir });
    }

    if !args.yes && !output.is_quiet() && output.is_interactive() {
        output.header("Summary:")?;
        output.field("Base", &plan.selection.base.id)?;
        let order: Vec<&str> = plan.validation.ordered_addons().iter().map(|a| a.id.as_str()).collect();
        if !order.is_empty() {
            output.field("Addons", &order.join(", "))?;
        }
        output.field("Output", &project_dir.display().to_string())?;
        if !output.confirm("Proceed with generation?")? {
            output.warning("Generation cancelled")?;
            return Ok(());
        }
    }

    let workspace = create_workspace(&project_dir)?;
    let context = ExecutionContext::new(variables, plan.ops.base.template_dir.clone(), workspace.root());
    let engine = create_engine(workspace, context);
    let addon_ops = plan.ordered_addon_ops();

    let spinner = output.spinner("Generating project...");
    let composed = engine.compose(&plan.ops.base, &addon_ops);
    spinner.finish_and_clear();

    match composed {
        Ok(results) => {
            info!(operations = results.len(), root = %engine.workspace().root().display(), "project generated");
            output.success("Project generated successfully")?;
            output.field("Location", &engine.workspace().root().display().to_string())?;
            output.field("Operations executed", &results.len().to_string())?;
            Ok(())
        }
        Err(err) => {
            let root = engine.workspace().root().display().to_string();
            if !args.clean_on_failure {
                output.warning(&format!("Partial output left at {root}"))?;
            } else if let Err(cleanup) = engine.workspace().cleanup() {
                warn!(error = %cleanup, "could not remove partial output");
            } else {
                info!(root = %root, "removed partial output");
            }
            Err(err.into())
        }
    }
}

/// Flags and settings file first, then the base template, then the
/// configured default.
fn resolve_project_type(request: &Request, plan: &Plan, config: &AppConfig) -> CliResult<ProjectType> {
    if let Some(project_type) = request.project_type.or(plan.selection.base.project_type) {
        return Ok(project_type);
    }
    config
        .defaults
        .project_type
        .parse()
        .map_err(|e: hexp_core::domain::DomainError| CliError::ConfigError {
            message: format!("defaults.project_type: {e}"),
            source: Some(Box::new(e)),
        })
}

/// Prompt defaults, then file and `--var` values, then the project name and
/// type.
fn build_variables(plan: &Plan, request: &Request, name: &str, project_type: ProjectType) -> Variables {
    let mut variables = plan.selection.prompt_defaults();
    variables.extend(request.variables.clone());
    variables.insert("projectName".into(), Value::String(name.to_string()));
    variables.insert("projectType".into(), Value::String(project_type.as_str().to_string()));
    variables
}

fn summarize<'a>(id: &'a str, name: &'a str, operations: usize) -> TemplateSummary<'a> {
    TemplateSummary { id, name, operations }
}

fn print_dry_run(output: &OutputManager, report: &DryRun<'_>) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        output.json(report)?;
        return Ok(());
    }

    output.header("Generation Plan (Dry Run):")?;
    output.print("")?;
    output.header("Base Template:")?;
    output.field("ID", report.base.id)?;
    output.field("Name", report.base.name)?;
    output.field("Operations", &report.base.operations.to_string())?;

    if !report.addons.is_empty() {
        output.print("")?;
        output.header("Addon Templates (in order):")?;
        for addon in &report.addons {
            output.print(&format!("  - {}: {} ({} operations)", addon.id, addon.name, addon.operations))?;
        }
    }

    output.print("")?;
    output.header("Project Configuration:")?;
    output.field("Name", report.project_name)?;
    output.field("Type", report.project_type.as_str())?;
    output.field("Output", &report.output.display().to_string())?;

    output.print("")?;
    output.header("Variables:")?;
    for (key, value) in report.variables {
        let shown = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        output.field(key, &shown)?;
    }

    output.print("")?;
    output.success("Dry run completed. No files were created.")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    // ── project names ─────────────────────────────────────────────────────

    #[test]
    fn accepts_lowercase_digits_and_hyphens() {
        assert!(validate_project_name("my-app-2").is_ok());
    }

    #[test]
    fn rejects_empty_and_malformed_names() {
        let empty = validate_project_name("  ").unwrap_err();
        assert!(empty.to_string().contains("Project name cannot be empty"));

        for bad in ["My-App", "my_app", "my app", "app!"] {
            let err = validate_project_name(bad).unwrap_err();
            assert!(
                err.to_string().contains("only lowercase letters, numbers, and hyphens"),
                "{bad}"
            );
        }
    }

    // ── settings file ─────────────────────────────────────────────────────

    #[test]
    fn parses_each_format() {
        let json = GenerationFile::parse(r#"{"base":"web","addons":["db"]}"#, FileFormat::Json).unwrap();
        let yaml = GenerationFile::parse("base: web\naddons:\n  - db\n", FileFormat::Yaml).unwrap();
        let toml = GenerationFile::parse("base = \"web\"\naddons = [\"db\"]\n", FileFormat::Toml).unwrap();

        assert_eq!(json, yaml);
        assert_eq!(json, toml);
        assert_eq!(json.addons, Some(vec!["db".to_string()]));
    }

    #[test]
    fn auto_detects_yaml_and_json() {
        assert_eq!(FileFormat::sniff("---\nbase: web"), FileFormat::Yaml);
        assert_eq!(FileFormat::sniff("name: demo"), FileFormat::Yaml);
        assert_eq!(FileFormat::sniff(r#"{"name": "demo"}"#), FileFormat::Json);

        let file = GenerationFile::parse("name: demo\n", FileFormat::Auto).unwrap();
        assert_eq!(file.name.as_deref(), Some("demo"));
    }

    #[test]
    fn reports_syntax_and_schema_errors_separately() {
        let syntax = GenerationFile::parse("{ nope", FileFormat::Json).unwrap_err();
        assert!(syntax.starts_with("Invalid JSON in config file"));

        let unknown = GenerationFile::parse(r#"{"colour": "red"}"#, FileFormat::Json).unwrap_err();
        assert!(unknown.starts_with("Config validation failed"));

        let empty_base = GenerationFile::parse(r#"{"base": ""}"#, FileFormat::Json).unwrap_err();
        assert!(empty_base.contains("base: must not be empty"));
    }

    #[test]
    fn missing_file_is_reported() {
        let tmp = TempDir::new().unwrap();
        let err = GenerationFile::load(&tmp.path().join("absent.yaml")).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn loads_from_disk_by_extension() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("hexp.yml");
        std::fs::write(&path, "name: shop\nvariables:\n  port: 3000\n").unwrap();

        let file = GenerationFile::load(&path).unwrap();
        assert_eq!(file.name.as_deref(), Some("shop"));
        assert_eq!(file.variables["port"], json!(3000));
    }

    // ── merging ───────────────────────────────────────────────────────────

    #[test]
    fn flags_win_over_file() {
        let args = CreateArgs {
            base: Some("api".into()),
            single: true,
            vars: vec![("port".into(), json!(8080))],
            ..CreateArgs::default()
        };
        let file = GenerationFile {
            base: Some("web".into()),
            addons: Some(vec!["db".into()]),
            name: Some("shop".into()),
            monorepo: Some(true),
            variables: json!({"port": 3000, "title": "Shop"}).as_object().cloned().unwrap(),
            ..GenerationFile::default()
        };

        let request = Request::merge(&args, file);

        assert_eq!(request.base.as_deref(), Some("api"));
        assert_eq!(request.addons, ["db"]);
        assert_eq!(request.name.as_deref(), Some("shop"));
        assert_eq!(request.project_type, Some(ProjectType::Single));
        assert_eq!(request.variables["port"], json!(8080));
        assert_eq!(request.variables["title"], json!("Shop"));
        assert_eq!(request.output, PathBuf::from("."));
    }

    #[test]
    fn file_project_type_applies_without_flags() {
        let file = GenerationFile {
            monorepo: Some(true),
            ..GenerationFile::default()
        };
        let request = Request::merge(&CreateArgs::default(), file);
        assert_eq!(request.project_type, Some(ProjectType::Monorepo));
    }
}
