//! Path resolution for sysman
//!
//! # Environment Variables
//!
//! - `SYSMAN_CONFIG_DIR` - Override config directory (e.g., `~/dotfiles/sysman`)
//!
//! # Path Resolution Priority
//!
//! For config_dir():
//! 1. `SYSMAN_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/sysman` (if set)
//! 3. `~/.config/sysman`
//!
//! This is the only module that reads the environment. Everything else
//! receives resolved paths through [`Settings`](crate::settings::Settings).

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "SYSMAN_CONFIG_DIR";

/// Name of the desired-state file inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Get the user's home directory
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("Could not determine home directory ($HOME is not set)")
}

/// Get the sysman config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!(
            "Using config dir from {}: {}",
            ENV_CONFIG_DIR,
            path.display()
        );
        return Ok(path);
    }

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join("sysman");
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    let path = home_dir()?.join(".config").join("sysman");
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Get the default config file path
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE))
}

/// Expand ~ and environment variables in a path string.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

/// Resolve a configured path against the home directory
///
/// `~` and `$VARS` are expanded; relative results are taken relative to
/// `home`, so `services` and `~/services` mean the same thing.
pub fn resolve_in(home: &Path, path: &str) -> PathBuf {
    let expanded = expand(path);
    if expanded.is_absolute() {
        expanded
    } else {
        home.join(expanded)
    }
}
