//! Startup configuration for the launcher.
use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::logging::LogSettings;

/// Represents the structure of the configuration file.
///
/// Every field is optional; a missing field keeps its default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Logging backend selection.
    pub log: LogSettings,
    /// File receiving the pid of the detached process.
    pub pid_file: Option<PathBuf>,
    /// Account to switch to after startup.
    pub user: Option<String>,
    /// Desired open-file soft limit.
    pub nofile: Option<u64>,
    /// Detach from the terminal.
    pub daemonize: bool,
}

/// Loads a YAML configuration file.
pub fn load_config(config_path: &Path) -> Result<RuntimeConfig, ConfigError> {
    let content = fs::read_to_string(config_path).map_err(|e| {
        ConfigError::Read(std::io::Error::new(
            e.kind(),
            format!("{} ({})", e, config_path.display()),
        ))
    })?;

    parse_config(&content)
}

/// Parses YAML text into a [`RuntimeConfig`].
pub fn parse_config(content: &str) -> Result<RuntimeConfig, ConfigError> {
    Ok(serde_yaml::from_str(content)?)
}
