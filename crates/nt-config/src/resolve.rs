//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG paths →
//! system config → built-in defaults.

use std::path::{Path, PathBuf};

use crate::trends::TrendConfig;
use crate::validate::{validate_trends, ValidationResult};

/// Where the configuration came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    CliArgument,
    Environment,
    XdgConfig,
    /// Found in /etc/name-trends/.
    SystemConfig,
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::SystemConfig => write!(f, "system config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

const ENV_CONFIG_PATH: &str = "NAME_TRENDS_CONFIG";
const ENV_CONFIG_DIR: &str = "NAME_TRENDS_CONFIG_DIR";

const CONFIG_FILENAME: &str = "trends.json";

/// Application name for XDG and system directories.
const APP_NAME: &str = "name-trends";

/// Resolve the trends.json path.
///
/// 1. Explicit CLI path (if it exists)
/// 2. `NAME_TRENDS_CONFIG`
/// 3. `NAME_TRENDS_CONFIG_DIR` + trends.json
/// 4. XDG config directory (~/.config/name-trends/)
/// 5. System config (/etc/name-trends/)
/// 6. Built-in defaults (None)
pub fn resolve_config(cli_path: Option<&Path>) -> (Option<PathBuf>, ConfigSource) {
    if let Some(path) = cli_path {
        if path.exists() {
            return (Some(path.to_path_buf()), ConfigSource::CliArgument);
        }
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return (Some(path), ConfigSource::Environment);
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(CONFIG_FILENAME);
        if path.exists() {
            return (Some(path), ConfigSource::Environment);
        }
    }

    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(CONFIG_FILENAME);
        if path.exists() {
            return (Some(path), ConfigSource::XdgConfig);
        }
    }

    let system_path = system_config_dir().join(CONFIG_FILENAME);
    if system_path.exists() {
        return (Some(system_path), ConfigSource::SystemConfig);
    }

    (None, ConfigSource::BuiltinDefault)
}

/// A validated configuration and where it was found.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: TrendConfig,
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Resolve, parse and validate trends.json.
///
/// A CLI path that does not exist falls through to the next source, the
/// same as an unset variable.
pub fn load_config(cli_path: Option<&Path>) -> ValidationResult<LoadedConfig> {
    let (path, source) = resolve_config(cli_path);
    let config = match &path {
        Some(p) => TrendConfig::from_file(p)?,
        None => TrendConfig::default(),
    };
    validate_trends(&config)?;
    Ok(LoadedConfig {
        config,
        path,
        source,
    })
}

pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

pub fn system_config_dir() -> PathBuf {
    PathBuf::from("/etc").join(APP_NAME)
}
