//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables `HEXP_<SECTION>__<KEY>` (e.g. `HEXP_TEMPLATES__DIR`)
//! 3. `.hexp.toml` in the working directory
//! 4. The per-user config file, or the file given with `--config`
//! 5. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Name of the per-directory override file.
pub const LOCAL_CONFIG_FILE: &str = ".hexp.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Template discovery.
    pub templates: TemplateConfig,
    /// Output settings.
    pub output: OutputConfig,
    /// Default values for new projects.
    pub defaults: Defaults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory holding `templates/bases` and `templates/addons`.
    pub dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`; `--output-format` wins.
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// `single` or `monorepo`; used when neither the flags nor the base
    /// template decide.
    pub project_type: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            project_type: "single".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration, layering files and environment over defaults.
    ///
    /// `config_file` is the path given via `--config`; it must exist. The
    /// per-user file and `.hexp.toml` are optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        Self::load_from(config_file, Path::new(LOCAL_CONFIG_FILE))
    }

    fn load_from(config_file: Option<&PathBuf>, local: &Path) -> anyhow::Result<Self> {
        let defaults = Config::try_from(&Self::default()).context("invalid built-in defaults")?;

        let user_file = match config_file {
            Some(path) => File::from(path.as_path()).format(FileFormat::Toml).required(true),
            None => File::from(Self::config_path()).format(FileFormat::Toml).required(false),
        };

        let settings = Config::builder()
            .add_source(defaults)
            .add_source(user_file)
            .add_source(File::from(local).format(FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix("HEXP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to read configuration")?;

        let config: Self = settings
            .try_deserialize()
            .context("configuration has an unexpected shape")?;
        debug!(templates = %config.templates.dir.display(), "configuration loaded");
        Ok(config)
    }

    /// Path to the per-user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.hexp.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "hexp", "hexp")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Look up a dotted key, e.g. `templates.dir`.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "templates.dir" => Some(self.templates.dir.display().to_string()),
            "output.no_color" => Some(self.output.no_color.to_string()),
            "output.format" => Some(self.output.format.clone()),
            "defaults.project_type" => Some(self.defaults.project_type.clone()),
            _ => None,
        }
    }

    /// Every key understood by [`get`](Self::get).
    pub const KEYS: &'static [&'static str] = &[
        "templates.dir",
        "output.no_color",
        "output.format",
        "defaults.project_type",
    ];
}
