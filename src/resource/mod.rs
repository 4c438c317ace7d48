//! Resource kinds managed by sysman
//!
//! Each kind implements [`reconcile::Resource`] on its own. [`ManagedResource`]
//! closes over all of them so one current list and one target list can be
//! reconciled together.

use anyhow::Result;
use reconcile::{ApplyContext, Resource};
use std::fmt;

use crate::schema::SysmanConfig;
use crate::settings::Settings;

pub mod appimage;
pub mod daemon;
pub mod flatpak;

pub use appimage::AppImage;
pub use daemon::Daemon;
pub use flatpak::Flatpak;

/// Resource kinds, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ResourceKind {
    Daemon,
    Flatpak,
    #[value(name = "appimage")]
    AppImage,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [Self::Daemon, Self::Flatpak, Self::AppImage];

    /// Matches [`Resource::resource_type`] of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daemon => "daemon",
            Self::Flatpak => "flatpak",
            Self::AppImage => "appimage",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any resource sysman knows how to manage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagedResource {
    Daemon(Daemon),
    Flatpak(Flatpak),
    AppImage(AppImage),
}

impl ManagedResource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Daemon(_) => ResourceKind::Daemon,
            Self::Flatpak(_) => ResourceKind::Flatpak,
            Self::AppImage(_) => ResourceKind::AppImage,
        }
    }

    /// Short name shown in listings (daemon id or alias)
    pub fn name(&self) -> &str {
        match self {
            Self::Daemon(d) => &d.id,
            Self::Flatpak(f) => &f.alias,
            Self::AppImage(a) => &a.alias,
        }
    }

    /// One-line detail for diffs and status output
    pub fn detail(&self) -> String {
        match self {
            Self::Daemon(d) => d.exec_start.clone(),
            Self::Flatpak(f) => f.flatpak_id.clone(),
            Self::AppImage(a) => a
                .url
                .clone()
                .unwrap_or_else(|| a.path().display().to_string()),
        }
    }
}

impl Resource for ManagedResource {
    fn resource_type(&self) -> &'static str {
        self.kind().as_str()
    }

    fn describe(&self) -> String {
        match self {
            Self::Daemon(r) => r.describe(),
            Self::Flatpak(r) => r.describe(),
            Self::AppImage(r) => r.describe(),
        }
    }

    fn same_identity(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Daemon(a), Self::Daemon(b)) => a.same_identity(b),
            (Self::Flatpak(a), Self::Flatpak(b)) => a.same_identity(b),
            (Self::AppImage(a), Self::AppImage(b)) => a.same_identity(b),
            _ => false,
        }
    }

    fn create(&self, ctx: &ApplyContext) -> Result<()> {
        match self {
            Self::Daemon(r) => r.create(ctx),
            Self::Flatpak(r) => r.create(ctx),
            Self::AppImage(r) => r.create(ctx),
        }
    }

    fn delete(&self, ctx: &ApplyContext) -> Result<()> {
        match self {
            Self::Daemon(r) => r.delete(ctx),
            Self::Flatpak(r) => r.delete(ctx),
            Self::AppImage(r) => r.delete(ctx),
        }
    }
}

/// Build the target list from the config file
pub fn desired(config: &SysmanConfig, settings: &Settings) -> Vec<ManagedResource> {
    let daemons = config
        .daemons
        .iter()
        .map(|c| ManagedResource::Daemon(Daemon::new(c, settings)));
    let flatpaks = config
        .flatpaks
        .iter()
        .map(|c| ManagedResource::Flatpak(Flatpak::new(c, settings)));
    let appimages = config
        .appimages
        .iter()
        .map(|c| ManagedResource::AppImage(AppImage::new(c, settings)));

    daemons.chain(flatpaks).chain(appimages).collect()
}

/// Build the current list from what is installed on this machine
pub fn discover(settings: &Settings) -> Result<Vec<ManagedResource>> {
    let mut current = Vec::new();
    current.extend(
        Daemon::discover(settings)?
            .into_iter()
            .map(ManagedResource::Daemon),
    );
    current.extend(
        Flatpak::discover(settings)?
            .into_iter()
            .map(ManagedResource::Flatpak),
    );
    current.extend(
        AppImage::discover(settings)?
            .into_iter()
            .map(ManagedResource::AppImage),
    );
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AppImageConfig, DaemonConfig, FlatpakConfig, SettingsConfig};
    use reconcile::testing::check_identity_laws;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn settings(home: &Path) -> Settings {
        Settings::with_home(home.to_path_buf(), &SettingsConfig::default())
    }

    fn config() -> SysmanConfig {
        SysmanConfig {
            daemons: vec![DaemonConfig {
                id: "web".into(),
                description: "web".into(),
                exec_start: "run".into(),
            }],
            flatpaks: vec![FlatpakConfig {
                alias: "web".into(),
                id: "org.example.Web".into(),
            }],
            appimages: vec![AppImageConfig {
                alias: "web".into(),
                url: "https://example.com/web.AppImage".into(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_desired_preserves_kind_order() {
        let settings = settings(Path::new("/home/op"));
        let target = desired(&config(), &settings);
        let kinds: Vec<_> = target.iter().map(ManagedResource::kind).collect();
        assert_eq!(kinds, ResourceKind::ALL);
        assert_eq!(target[1].describe(), "flatpak:web");
        assert_eq!(target[1].detail(), "org.example.Web");
    }

    #[test]
    fn test_same_name_across_kinds_is_distinct() {
        let settings = settings(Path::new("/home/op"));
        let target = desired(&config(), &settings);
        assert!(!target[0].same_identity(&target[1]));
        assert!(!target[1].same_identity(&target[2]));
        assert!(target[2].same_identity(&target[2].clone()));
        assert_eq!(check_identity_laws(&target), Ok(()));
    }

    #[test]
    fn test_discover_then_diff_against_config() {
        let tmp = TempDir::new().unwrap();
        let settings = settings(tmp.path());
        settings.ensure_dirs().unwrap();

        // An installed AppImage that is no longer configured
        fs::write(settings.appimage_dir.join("old.AppImage"), "elf").unwrap();
        let web = Daemon::new(&config().daemons[0], &settings);
        fs::write(web.unit_path(), web.render_unit()).unwrap();

        let current = discover(&settings).unwrap();
        assert_eq!(current.len(), 2);

        let target = desired(&config(), &settings);
        let changes = reconcile::diff(&current, &target);
        let created: Vec<_> = changes.creations.iter().map(|r| r.describe()).collect();
        let removed: Vec<_> = changes.removals.iter().map(|r| r.describe()).collect();
        assert_eq!(created, vec!["flatpak:web", "appimage:web"]);
        assert_eq!(removed, vec!["appimage:old"]);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ResourceKind::AppImage.to_string(), "appimage");
        let settings = settings(Path::new("/home/op"));
        for r in desired(&config(), &settings) {
            assert_eq!(r.resource_type(), r.kind().as_str());
            assert_eq!(r.name(), "web");
        }
    }
}
