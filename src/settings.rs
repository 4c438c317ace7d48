//! Resolved runtime settings
//!
//! Built once in `main` from the home directory and the `[settings]` table,
//! then passed to discovery and to every resource constructor.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;
use crate::schema::SettingsConfig;

/// Default remote for flatpak installs
pub const DEFAULT_FLATPAK_REMOTE: &str = "flathub";

/// Where each resource kind keeps its files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// User home directory
    pub home: PathBuf,
    /// Parent of each daemon's working directory (`~/services`)
    pub services_dir: PathBuf,
    /// systemd user unit directory (`~/.config/systemd/user`)
    pub systemd_dir: PathBuf,
    /// Download location for AppImages (`~/AppImages`)
    pub appimage_dir: PathBuf,
    /// Directory flatpak aliases are linked into (`~/.local/bin`)
    pub bin_dir: PathBuf,
    /// Flatpak's exported launchers (`~/.local/share/flatpak/exports/bin`)
    pub flatpak_exports_dir: PathBuf,
    /// Remote flatpaks are installed from
    pub flatpak_remote: String,
    /// Worker pool width
    pub jobs: usize,
}

impl Settings {
    /// Resolve settings for the current user
    pub fn resolve(overrides: &SettingsConfig) -> Result<Self> {
        let home = paths::home_dir()?;
        Ok(Self::with_home(home, overrides))
    }

    /// Resolve settings against an explicit home directory
    pub fn with_home(home: PathBuf, overrides: &SettingsConfig) -> Self {
        let dir = |value: &Option<String>, default: &str| {
            paths::resolve_in(&home, value.as_deref().unwrap_or(default))
        };

        Self {
            services_dir: dir(&overrides.services_dir, "services"),
            systemd_dir: dir(&overrides.systemd_dir, ".config/systemd/user"),
            appimage_dir: dir(&overrides.appimage_dir, "AppImages"),
            bin_dir: dir(&overrides.bin_dir, ".local/bin"),
            flatpak_exports_dir: dir(
                &overrides.flatpak_exports_dir,
                ".local/share/flatpak/exports/bin",
            ),
            flatpak_remote: overrides
                .flatpak_remote
                .clone()
                .unwrap_or_else(|| DEFAULT_FLATPAK_REMOTE.to_string()),
            jobs: overrides
                .jobs
                .unwrap_or_else(reconcile::ReconcileOptions::default_jobs),
            home,
        }
    }

    /// Create every directory resources write into
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in self.managed_dirs() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }

    /// Directories created by [`ensure_dirs`](Self::ensure_dirs)
    pub fn managed_dirs(&self) -> [&Path; 4] {
        [
            self.services_dir.as_path(),
            self.systemd_dir.as_path(),
            self.appimage_dir.as_path(),
            self.bin_dir.as_path(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_under_home() {
        let settings = Settings::with_home(PathBuf::from("/home/op"), &SettingsConfig::default());
        assert_eq!(settings.services_dir, PathBuf::from("/home/op/services"));
        assert_eq!(
            settings.systemd_dir,
            PathBuf::from("/home/op/.config/systemd/user")
        );
        assert_eq!(settings.appimage_dir, PathBuf::from("/home/op/AppImages"));
        assert_eq!(settings.bin_dir, PathBuf::from("/home/op/.local/bin"));
        assert_eq!(
            settings.flatpak_exports_dir,
            PathBuf::from("/home/op/.local/share/flatpak/exports/bin")
        );
        assert_eq!(settings.flatpak_remote, "flathub");
        assert!(settings.jobs >= 1);
    }

    #[test]
    fn test_overrides_win() {
        let overrides = SettingsConfig {
            appimage_dir: Some("/opt/appimages".into()),
            bin_dir: Some("bin".into()),
            flatpak_remote: Some("fedora".into()),
            jobs: Some(3),
            ..Default::default()
        };
        let settings = Settings::with_home(PathBuf::from("/home/op"), &overrides);
        assert_eq!(settings.appimage_dir, PathBuf::from("/opt/appimages"));
        assert_eq!(settings.bin_dir, PathBuf::from("/home/op/bin"));
        assert_eq!(settings.flatpak_remote, "fedora");
        assert_eq!(settings.jobs, 3);
    }

    #[test]
    fn test_ensure_dirs_creates_everything() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::with_home(tmp.path().to_path_buf(), &SettingsConfig::default());

        settings.ensure_dirs().unwrap();
        for dir in settings.managed_dirs() {
            assert!(dir.is_dir(), "{} should exist", dir.display());
        }

        // Second run is a no-op
        settings.ensure_dirs().unwrap();
    }
}
