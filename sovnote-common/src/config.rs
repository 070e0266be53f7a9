//! Configuration file discovery and loading
//!
//! Config resolution follows the same priority order for every module:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled defaults (fallback)
//!
//! This module handles locating and parsing the TOML file. Individual modules
//! define their own schema and apply CLI/ENV overrides on top.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Directory name under the platform config dir (e.g. `~/.config/sovnote`)
pub const CONFIG_DIR_NAME: &str = "sovnote";

/// Default log level when neither RUST_LOG nor config specify one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Logging section shared by all module configs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive (e.g. "info", "sovnote_ai=debug")
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Platform default location of a module's TOML file
///
/// `<config_dir>/sovnote/<module_name>.toml`, where `<config_dir>` is
/// `~/.config` on Linux, `~/Library/Application Support` on macOS and
/// `%APPDATA%` on Windows.
pub fn default_config_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(format!("{}.toml", module_name)))
}

/// Resolve which TOML file (if any) a module should read
///
/// An explicit path (CLI or ENV) is returned even if it does not exist so the
/// caller can report it. The platform default is only returned when present.
pub fn resolve_config_path(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    module_name: &str,
) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform default, only if it exists
    default_config_path(module_name).filter(|p| p.exists())
}

/// Load a TOML config file into `T`
///
/// A missing file is not fatal: a warning is logged and `T::default()` is
/// returned. A file that exists but fails to parse is an error.
pub fn load_toml_config<T>(path: Option<&Path>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let Some(path) = path else {
        info!("No config file found, using compiled defaults");
        return Ok(T::default());
    };

    if !path.exists() {
        warn!(
            "Config file {} not found, using compiled defaults",
            path.display()
        );
        return Ok(T::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str(&content).map_err(|source| Error::TomlParse {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Loaded config from {}", path.display());
    Ok(config)
}
