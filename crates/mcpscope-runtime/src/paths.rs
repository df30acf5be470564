//! Platform-specific locations of the two configuration files.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Errors resolving configuration file locations.
#[derive(Debug, Error)]
pub enum PathError {
    /// The platform reports no user configuration directory.
    #[error("no platform config directory available")]
    NoConfigDir,
}

/// Location of the desktop assistant's server configuration file.
///
/// Resolution order:
/// 1. `MCPSCOPE_ASSISTANT_CONFIG` environment variable
/// 2. Platform config dir (`~/Library/Application Support` on macOS,
///    `~/.config` on Linux, `%APPDATA%` on Windows) + `Claude/claude_desktop_config.json`
pub fn assistant_config_path() -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var("MCPSCOPE_ASSISTANT_CONFIG") {
        return Ok(PathBuf::from(path));
    }
    let config_dir = dirs::config_dir().ok_or(PathError::NoConfigDir)?;
    Ok(config_dir.join("Claude").join("claude_desktop_config.json"))
}

/// Location of the editor's user settings file.
///
/// Resolution order:
/// 1. `MCPSCOPE_EDITOR_CONFIG` environment variable
/// 2. Platform config dir + `Code/User/settings.json`
pub fn editor_settings_path() -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var("MCPSCOPE_EDITOR_CONFIG") {
        return Ok(PathBuf::from(path));
    }
    let config_dir = dirs::config_dir().ok_or(PathError::NoConfigDir)?;
    Ok(config_dir.join("Code").join("User").join("settings.json"))
}
