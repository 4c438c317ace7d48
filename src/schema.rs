//! Desired-state configuration file
//!
//! ```toml
//! [settings]
//! appimage_dir = "~/Applications"
//! jobs = 4
//!
//! [[daemons]]
//! id = "web"
//! description = "web server"
//! exec_start = "serve --port 8080"
//!
//! [[flatpaks]]
//! alias = "firefox"
//! id = "org.mozilla.firefox"
//!
//! [[appimages]]
//! alias = "obsidian"
//! url = "https://example.com/Obsidian.AppImage"
//! ```

use anyhow::{Context, Result, bail};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

/// Names that end up in file and unit names
static SAFE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._@-]*$").expect("valid regex"));

// ============================================================================
// Main Config Schema
// ============================================================================

/// The sysman configuration file
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SysmanConfig {
    /// Path and pool overrides
    #[serde(default)]
    pub settings: SettingsConfig,

    /// User services supervised by systemd
    #[serde(default)]
    pub daemons: Vec<DaemonConfig>,

    /// Flatpak applications exposed under a short alias
    #[serde(default)]
    pub flatpaks: Vec<FlatpakConfig>,

    /// AppImages downloaded from a URL
    #[serde(default)]
    pub appimages: Vec<AppImageConfig>,
}

impl SysmanConfig {
    /// Load and validate the config at `path`
    ///
    /// A missing file is an empty configuration.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No config at {}, using empty target", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file: {}", path.display()))?;

        let config = Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        log::debug!(
            "Loaded {} daemons, {} flatpaks, {} appimages from {}",
            config.daemons.len(),
            config.flatpaks.len(),
            config.appimages.len(),
            path.display()
        );
        Ok(config)
    }

    /// Parse and validate TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Invalid TOML format")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.settings.validate()?;

        let mut seen = HashSet::new();
        for daemon in &self.daemons {
            daemon
                .validate()
                .with_context(|| format!("Invalid daemon '{}'", daemon.id))?;
            if !seen.insert(daemon.id.as_str()) {
                bail!("Duplicate daemon id '{}'", daemon.id);
            }
        }

        let mut seen = HashSet::new();
        for flatpak in &self.flatpaks {
            flatpak
                .validate()
                .with_context(|| format!("Invalid flatpak '{}'", flatpak.alias))?;
            if !seen.insert(flatpak.alias.as_str()) {
                bail!("Duplicate flatpak alias '{}'", flatpak.alias);
            }
        }

        let mut seen = HashSet::new();
        for appimage in &self.appimages {
            appimage
                .validate()
                .with_context(|| format!("Invalid appimage '{}'", appimage.alias))?;
            if !seen.insert(appimage.alias.as_str()) {
                bail!("Duplicate appimage alias '{}'", appimage.alias);
            }
        }

        Ok(())
    }

    /// Total number of declared resources
    pub fn resource_count(&self) -> usize {
        self.daemons.len() + self.flatpaks.len() + self.appimages.len()
    }
}

// ============================================================================
// Settings - path overrides
// ============================================================================

/// Optional overrides for where resources live on disk
///
/// Unset values fall back to the defaults in
/// [`Settings`](crate::settings::Settings).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SettingsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub systemd_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appimage_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flatpak_exports_dir: Option<String>,
    /// Remote flatpaks are installed from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flatpak_remote: Option<String>,
    /// Worker pool width
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

impl SettingsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.jobs == Some(0) {
            bail!("settings.jobs must be at least 1");
        }
        if let Some(remote) = &self.flatpak_remote
            && remote.trim().is_empty()
        {
            bail!("settings.flatpak_remote cannot be empty");
        }
        Ok(())
    }
}

// ============================================================================
// Resources
// ============================================================================

/// A user service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DaemonConfig {
    /// Path-safe name, used for the unit and working directory
    pub id: String,
    #[serde(default)]
    pub description: String,
    /// Command line, relative to the daemon's working directory
    pub exec_start: String,
}

impl DaemonConfig {
    pub fn validate(&self) -> Result<()> {
        validate_name("id", &self.id)?;
        if self.exec_start.trim().is_empty() {
            bail!("exec_start cannot be empty");
        }
        if self.description.contains('\n') || self.exec_start.contains('\n') {
            bail!("description and exec_start must be single lines");
        }
        Ok(())
    }
}

/// A flatpak application
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlatpakConfig {
    /// Short command name the app is linked as
    pub alias: String,
    /// Flatpak application id (e.g., "org.mozilla.firefox")
    pub id: String,
}

impl FlatpakConfig {
    pub fn validate(&self) -> Result<()> {
        validate_name("alias", &self.alias)?;
        validate_name("id", &self.id)?;
        if !self.id.contains('.') {
            bail!("id '{}' is not a reverse-DNS application id", self.id);
        }
        Ok(())
    }
}

/// An AppImage downloaded from a URL
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppImageConfig {
    pub alias: String,
    pub url: String,
}

impl AppImageConfig {
    pub fn validate(&self) -> Result<()> {
        validate_name("alias", &self.alias)?;
        if !(self.url.starts_with("https://") || self.url.starts_with("http://")) {
            bail!("url must start with http:// or https://");
        }
        Ok(())
    }
}

fn validate_name(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        bail!("{} cannot be empty", field);
    }
    if !SAFE_NAME.is_match(value) {
        bail!(
            "{} '{}' may only contain letters, digits, '.', '_', '@' and '-'",
            field,
            value
        );
    }
    Ok(())
}
