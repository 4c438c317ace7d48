//! Flatpak resource - install an application and link it under a short alias

use anyhow::{Context, Result};
use reconcile::{ApplyContext, Resource};
use std::fs;
use std::path::PathBuf;

use crate::schema::FlatpakConfig;
use crate::settings::Settings;
use crate::{fsops, runner};

/// A flatpak application exposed as `<bin_dir>/<alias>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flatpak {
    /// Friendly, path-safe command name
    pub alias: String,
    /// Flatpak application id
    pub flatpak_id: String,
    remote: String,
    bin_dir: PathBuf,
    exports_dir: PathBuf,
}

impl Flatpak {
    pub fn new(config: &FlatpakConfig, settings: &Settings) -> Self {
        Self::with_id(&config.alias, &config.id, settings)
    }

    fn with_id(alias: &str, flatpak_id: &str, settings: &Settings) -> Self {
        Self {
            alias: alias.to_string(),
            flatpak_id: flatpak_id.to_string(),
            remote: settings.flatpak_remote.clone(),
            bin_dir: settings.bin_dir.clone(),
            exports_dir: settings.flatpak_exports_dir.clone(),
        }
    }

    /// Where the alias symlink lives
    pub fn link_path(&self) -> PathBuf {
        self.bin_dir.join(&self.alias)
    }

    /// Launcher exported by flatpak for this application
    pub fn export_path(&self) -> PathBuf {
        self.exports_dir.join(&self.flatpak_id)
    }

    /// Another alias in `bin_dir` that still launches this application
    fn other_alias(&self) -> Result<Option<PathBuf>> {
        let dir = &self.bin_dir;
        if !dir.is_dir() {
            return Ok(None);
        }

        let own = self.link_path();
        let export = self.export_path();
        let entries =
            fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path == own || !path.is_symlink() {
                continue;
            }
            let target = fs::read_link(&path)
                .with_context(|| format!("Failed to read symlink {}", path.display()))?;
            if target == export {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }

    /// Find every alias symlink that points into flatpak's exports
    pub fn discover(settings: &Settings) -> Result<Vec<Self>> {
        let dir = &settings.bin_dir;
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries =
            fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;

        let mut apps = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_symlink() {
                continue;
            }

            let target = fs::read_link(&path)
                .with_context(|| format!("Failed to read symlink {}", path.display()))?;
            if !target.starts_with(&settings.flatpak_exports_dir) {
                continue;
            }

            let (Some(alias), Some(flatpak_id)) = (
                path.file_name().and_then(|n| n.to_str()),
                target.file_name().and_then(|n| n.to_str()),
            ) else {
                continue;
            };
            apps.push(Self::with_id(alias, flatpak_id, settings));
        }

        apps.sort_by(|a, b| a.alias.cmp(&b.alias));
        log::debug!("discovered {} flatpak aliases in {}", apps.len(), dir.display());
        Ok(apps)
    }
}

impl Resource for Flatpak {
    fn resource_type(&self) -> &'static str {
        "flatpak"
    }

    fn describe(&self) -> String {
        format!("flatpak:{}", self.alias)
    }

    fn same_identity(&self, other: &Self) -> bool {
        self.alias == other.alias
    }

    fn create(&self, ctx: &ApplyContext) -> Result<()> {
        if !runner::command_exists("flatpak") {
            anyhow::bail!("flatpak is not installed");
        }
        runner::run(
            "flatpak",
            &[
                "install",
                "--user",
                "-y",
                "--noninteractive",
                &self.remote,
                &self.flatpak_id,
            ],
        )?;

        ctx.check_cancelled()?;
        fsops::symlink(&self.export_path(), &self.link_path())
    }

    fn delete(&self, _ctx: &ApplyContext) -> Result<()> {
        let link = self.link_path();
        if link.is_symlink() {
            fsops::remove_file(&link)?;
        }

        if let Some(other) = self.other_alias()? {
            log::info!(
                "keeping {} installed, still linked as {}",
                self.flatpak_id,
                other.display()
            );
            return Ok(());
        }

        runner::run(
            "flatpak",
            &["uninstall", "--user", "-y", "--noninteractive", &self.flatpak_id],
        )
    }
}
