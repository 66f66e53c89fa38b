//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `KILN__<SECTION>__<KEY>`
//! 3. Config file (`--config`, else the platform config dir when present)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Environment prefix; `KILN__DEFAULTS__FRAMEWORK=drf` sets `defaults.framework`.
pub const ENV_PREFIX: &str = "KILN";
const ENV_SEPARATOR: &str = "__";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Fallbacks for parameters missing from flags and parameter files.
    pub defaults: Defaults,
    pub materialize: MaterializeConfig,
    pub scaffold: ScaffoldConfig,
    /// Output settings.
    pub output: OutputConfig,
}

/// No variant or database default is built in; one must be chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub framework: Option<String>,
    pub database: Option<String>,
    pub author_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterializeConfig {
    /// Run `git init` + initial commit after every materialization.
    pub init_git: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldConfig {
    pub source_dir: PathBuf,
    /// Program plus arguments; the module name is appended.  Unset means the
    /// built-in skeleton writer is used.
    pub startapp_command: Option<Vec<String>>,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(kiln_core::application::DEFAULT_SOURCE_DIR),
            startapp_command: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration, starting from defaults.
    ///
    /// `config_file` is the path passed via `--config`; it must exist.  Without
    /// it the default location is read if present.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        Self::load_from(&path, required)
    }

    fn load_from(path: &Path, required: bool) -> anyhow::Result<Self> {
        let defaults = config::Config::try_from(&Self::default())
            .context("Failed to build default configuration")?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.kiln.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "kiln", "kiln")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".kiln.toml"))
    }

    /// The file `init` writes to and `config path` reports.
    pub fn active_path(config_file: Option<&PathBuf>) -> PathBuf {
        config_file.cloned().unwrap_or_else(Self::config_path)
    }
}
