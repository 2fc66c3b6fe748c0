//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "hexp",
    bin_name = "hexp",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Compose projects from a base template and addons",
    long_about = "hexp builds a project from one base template plus any number \
                  of addons, checking capabilities, conflicts, ordering and file \
                  collisions before a single file is written.",
    after_help = "EXAMPLES:\n\
        \x20 hexp list\n\
        \x20 hexp validate --base next-app --addons prisma,auth\n\
        \x20 hexp create --base next-app --addons prisma --name my-app\n\
        \x20 hexp completions bash > /usr/share/bash-completion/completions/hexp",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project from a base and addons.
    #[command(
        visible_alias = "new",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 hexp create --base next-app --name my-app\n\
            \x20 hexp create --base next-app --addons prisma,auth --name my-app --output ./work\n\
            \x20 hexp create --from hexp.yaml --dry-run\n\
            \x20 hexp create --base next-app --name my-app --var useDocker=true"
    )]
    Create(CreateArgs),

    /// List available templates.
    #[command(
        visible_alias = "ls",
        about = "List available templates",
        after_help = "EXAMPLES:\n\
            \x20 hexp list\n\
            \x20 hexp list --addons\n\
            \x20 hexp list --format json"
    )]
    List(ListArgs),

    /// Run the plan checks without writing anything.
    #[command(
        about = "Validate a base and addon selection",
        after_help = "EXAMPLES:\n\
            \x20 hexp validate --base next-app --addons prisma,drizzle\n\
            \x20 hexp validate --base next-app --addons prisma --format json"
    )]
    Validate(ValidateArgs),

    /// Initialise a hexp settings file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 hexp init           # per-user settings file\n\
            \x20 hexp init --local   # .hexp.toml in the current directory"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 hexp completions bash > ~/.local/share/bash-completion/completions/hexp\n\
            \x20 hexp completions zsh  > ~/.zfunc/_hexp\n\
            \x20 hexp completions fish > ~/.config/fish/completions/hexp.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the hexp settings.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 hexp config get templates.dir\n\
            \x20 hexp config list\n\
            \x20 hexp config path"
    )]
    Config(ConfigCommands),
}

// ── shared ────────────────────────────────────────────────────────────────────

/// Where to look for `templates/bases` and `templates/addons`.
#[derive(Debug, Clone, Default, Args)]
pub struct CatalogArgs {
    /// Directory containing `templates/` (overrides `templates.dir`).
    #[arg(long = "templates", value_name = "DIR", help = "Directory containing templates/")]
    pub templates: Option<PathBuf>,
}

// ── create ────────────────────────────────────────────────────────────────────

/// Arguments for `hexp create`.
#[derive(Debug, Clone, Default, Args)]
pub struct CreateArgs {
    /// Base template id.
    #[arg(long = "base", value_name = "ID", help = "Base template id")]
    pub base: Option<String>,

    /// Addon ids, comma separated or repeated.
    #[arg(
        long = "addons",
        value_name = "IDS",
        value_delimiter = ',',
        num_args = 1..,
        help = "Addon template ids"
    )]
    pub addons: Option<Vec<String>>,

    /// Project name (lowercase letters, digits and hyphens).
    #[arg(long = "name", value_name = "NAME", help = "Project name")]
    pub name: Option<String>,

    #[arg(long = "monorepo", conflicts_with = "single", help = "Force monorepo project type")]
    pub monorepo: bool,

    #[arg(long = "single", help = "Force single package project type")]
    pub single: bool,

    /// Parent directory of the new project.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory (default: current directory)"
    )]
    pub output: Option<PathBuf>,

    /// Generation settings file; flags given on the command line win.
    #[arg(
        long = "from",
        value_name = "FILE",
        help = "Read generation settings from a JSON, YAML or TOML file"
    )]
    pub from: Option<PathBuf>,

    /// Template variable, `KEY=VALUE`. JSON values (`true`, `3`, `[..]`) are
    /// decoded, anything else is kept as a string.
    #[arg(
        long = "var",
        value_name = "KEY=VALUE",
        value_parser = parse_var,
        help = "Set a template variable"
    )]
    pub vars: Vec<(String, Value)>,

    /// Preview the plan without writing any files.
    #[arg(
        long = "dry-run",
        visible_alias = "preview",
        help = "Show the generation plan without creating anything"
    )]
    pub dry_run: bool,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "yes", help = "Skip confirmation and create immediately")]
    pub yes: bool,

    /// Remove the half-generated project after a failure.
    #[arg(long = "clean-on-failure", help = "Remove partial output when generation fails")]
    pub clean_on_failure: bool,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

/// Parse one `--var KEY=VALUE`.
pub fn parse_var(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing variable name in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `hexp list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long = "bases", help = "Show only base templates")]
    pub bases: bool,

    #[arg(long = "addons", help = "Show only addon templates")]
    pub addons: bool,

    #[arg(long = "all", help = "Show bases and addons (default)")]
    pub all: bool,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

impl ListArgs {
    pub fn show_bases(&self) -> bool {
        self.bases || self.all || !self.addons
    }

    pub fn show_addons(&self) -> bool {
        self.addons || self.all || !self.bases
    }
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One id per line.
    List,
    /// JSON object with `bases`, `addons` and `errors`.
    Json,
}

// ── validate ──────────────────────────────────────────────────────────────────

/// Arguments for `hexp validate`.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(long = "base", value_name = "ID", help = "Base template id")]
    pub base: String,

    #[arg(
        long = "addons",
        value_name = "IDS",
        value_delimiter = ',',
        num_args = 1..,
        help = "Addon template ids"
    )]
    pub addons: Vec<String>,

    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Report format"
    )]
    pub format: ReportFormat,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

/// Output format for the `validate` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Human,
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `hexp init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.hexp.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `hexp completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `hexp config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `templates.dir`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the per-user configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
