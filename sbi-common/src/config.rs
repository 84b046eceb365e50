//! Settings loading and base folder resolution
//!
//! Base folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. `SBI_BASE_DIR` environment variable
//! 3. `base_dir` in the TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! Drafts live under `<base>/drafts`, final reports under `<base>/final`.
//! A missing config file is not an error: defaults apply and startup continues.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the base folder
pub const BASE_DIR_ENV: &str = "SBI_BASE_DIR";

/// Directory name used under the platform config/data folders
const APP_DIR_NAME: &str = "sbi";

/// Locations offered on the candidate-info screen out of the box
pub const DEFAULT_LOCATIONS: [&str; 3] = ["Hawthorne", "Palmdale", "North Long Beach"];

/// Logging section of the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter level when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// On-disk TOML config; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub base_dir: Option<PathBuf>,
    pub rubric_path: Option<PathBuf>,
    pub signals_path: Option<PathBuf>,
    pub locations: Option<Vec<String>>,
    pub logging: LoggingConfig,
}

/// Resolved settings used by the CLI
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_dir: PathBuf,
    pub rubric_path: PathBuf,
    pub signals_path: PathBuf,
    pub locations: Vec<String>,
    pub logging: LoggingConfig,
    /// Config file the settings were read from, if any
    pub config_file: Option<PathBuf>,
}

impl Settings {
    /// Resolve settings from CLI overrides, environment and config file
    ///
    /// `config_path` given explicitly must exist. Without it the platform
    /// config file is used when present; otherwise defaults apply and
    /// `config_file` is `None`. Does not log; call [`Settings::log_source`]
    /// once tracing is set up.
    pub fn resolve(cli_base_dir: Option<&Path>, config_path: Option<&Path>) -> Result<Self> {
        let file = match config_path {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|path| path.exists()),
        };
        let Some(file) = file else {
            return Ok(Self::from_toml(cli_base_dir, &TomlConfig::default(), None));
        };

        let toml_config = load_toml_config(&file)?;
        let mut settings = Self::from_toml(cli_base_dir, &toml_config, file.parent());
        settings.config_file = Some(file);
        Ok(settings)
    }

    /// Log where the settings came from
    pub fn log_source(&self) {
        match &self.config_file {
            Some(path) => info!("Config file: {}", path.display()),
            None => match default_config_path() {
                Some(path) => warn!("No config file at {}, using defaults", path.display()),
                None => warn!("Could not determine config directory, using defaults"),
            },
        }
    }

    /// Build settings from an already-parsed config
    ///
    /// Relative paths in the config file are taken relative to `config_dir`.
    pub fn from_toml(
        cli_base_dir: Option<&Path>,
        config: &TomlConfig,
        config_dir: Option<&Path>,
    ) -> Self {
        let anchor = |p: &Path| match config_dir {
            Some(dir) if p.is_relative() => dir.join(p),
            _ => p.to_path_buf(),
        };

        let base_dir = resolve_base_dir(
            cli_base_dir,
            BASE_DIR_ENV,
            config.base_dir.as_deref().map(&anchor).as_deref(),
        );
        let rubric_path = config
            .rubric_path
            .as_deref()
            .map(&anchor)
            .unwrap_or_else(|| default_data_file("rubric.json"));
        let signals_path = config
            .signals_path
            .as_deref()
            .map(&anchor)
            .unwrap_or_else(|| default_data_file("disqualifier_signals.json"));
        let locations = config
            .locations
            .clone()
            .unwrap_or_else(|| DEFAULT_LOCATIONS.iter().map(|s| s.to_string()).collect());

        Self {
            base_dir,
            rubric_path,
            signals_path,
            locations,
            logging: config.logging.clone(),
            config_file: None,
        }
    }

    pub fn drafts_dir(&self) -> PathBuf {
        self.base_dir.join("drafts")
    }

    pub fn final_dir(&self) -> PathBuf {
        self.base_dir.join("final")
    }

    /// Create the drafts and final-report folders
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(self.drafts_dir())?;
        std::fs::create_dir_all(self.final_dir())?;
        Ok(())
    }

    /// Add a location to the offered list
    ///
    /// Returns `false` when it was already present.
    pub fn add_location(&mut self, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Config(
                "Enter a school name before adding.".to_string(),
            ));
        }
        if self.locations.iter().any(|l| l == name) {
            return Ok(false);
        }
        self.locations.push(name.to_string());
        Ok(true)
    }

    /// Config-file form of these settings
    pub fn to_toml_config(&self) -> TomlConfig {
        TomlConfig {
            base_dir: Some(self.base_dir.clone()),
            rubric_path: Some(self.rubric_path.clone()),
            signals_path: Some(self.signals_path.clone()),
            locations: Some(self.locations.clone()),
            logging: self.logging.clone(),
        }
    }
}

/// Base folder by priority: CLI, environment variable, config value, default
pub fn resolve_base_dir(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    config_value: Option<&Path>,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = config_value {
        return path.to_path_buf();
    }

    default_base_dir()
}

/// Platform config file location (`<config dir>/sbi/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("config.toml"))
}

/// OS-dependent default base folder
pub fn default_base_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR_NAME).join("interviews"))
        .unwrap_or_else(|| PathBuf::from("./interviews"))
}

/// Default location of a data file shipped alongside the config
fn default_data_file(name: &str) -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR_NAME).join(name))
        .unwrap_or_else(|| PathBuf::from(name))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config {}: {}", path.display(), e))
    })?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config {}: {}", path.display(), e)))
}

/// Write a TOML config atomically (temp file + rename)
pub fn write_toml_config(config: &TomlConfig, target: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let temp = target.with_extension("toml.tmp");
    std::fs::write(&temp, content)?;
    std::fs::rename(&temp, target)?;
    info!("Config written to {}", target.display());
    Ok(())
}
