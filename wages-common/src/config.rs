//! Configuration file loading
//!
//! Settings come from a single TOML file found in this order:
//! 1. `--config` command line argument
//! 2. `WAGES_CONFIG` environment variable
//! 3. `<user config dir>/wages/config.toml`
//! 4. `/etc/wages/config.toml`
//! 5. Built-in defaults
//!
//! An explicitly named file that does not exist is not fatal: the defaults are
//! used and the caller is told so through [`ConfigSource::Missing`]. A file
//! that exists but does not parse is an error.

use crate::csv::CsvFields;
use crate::settings::{CalculatorConfig, CalculatorSettings};
use crate::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "WAGES_CONFIG";

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub calculator: CalculatorConfig,

    #[serde(default)]
    pub csv: CsvConfig,
}

/// `[server]` section, used by `wages-http`
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Default: 8080
    #[serde(default = "default_port")]
    pub port: u16,

    /// Default: 127.0.0.1
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Largest accepted upload request body
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// `[csv]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CsvConfig {
    /// Header names of the timesheet columns
    #[serde(default)]
    pub fields: CsvFields,
}

fn default_port() -> u16 {
    8080
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Reads and parses a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Validated calculator settings built from the `[calculator]` section
    pub fn calculator_settings(&self) -> Result<CalculatorSettings> {
        CalculatorSettings::from_config(&self.calculator)
    }
}

/// Where the loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// Named by argument or environment but absent; defaults used
    Missing(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Missing(path) => write!(f, "{} (not found, using defaults)", path.display()),
            ConfigSource::Defaults => write!(f, "built-in defaults"),
        }
    }
}

/// Picks the configuration file to use, if any
///
/// Argument and environment paths are returned whether or not they exist.
/// The per-user and system-wide locations are only returned when present.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    let user_config = dirs::config_dir().map(|d| d.join("wages").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    let system_config = PathBuf::from("/etc/wages/config.toml");
    if system_config.exists() {
        return Some(system_config);
    }

    None
}

/// Loads the configuration following the resolution order
///
/// Logging is left to the caller since this usually runs before the
/// subscriber is installed.
pub fn load_config(cli_arg: Option<&Path>) -> Result<(TomlConfig, ConfigSource)> {
    match resolve_config_path(cli_arg) {
        Some(path) if path.exists() => {
            let config = TomlConfig::load(&path)?;
            Ok((config, ConfigSource::File(path)))
        }
        Some(path) => Ok((TomlConfig::default(), ConfigSource::Missing(path))),
        None => Ok((TomlConfig::default(), ConfigSource::Defaults)),
    }
}
