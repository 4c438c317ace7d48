//! Build the current and target resource lists for a run

use anyhow::Result;
use reconcile::Changes;

use crate::resource::{self, ManagedResource, ResourceKind};
use crate::schema::SysmanConfig;
use crate::settings::Settings;

/// Both sides of a reconciliation, optionally restricted to one kind
#[derive(Debug, Clone, Default)]
pub struct Plan {
    /// What is installed
    pub current: Vec<ManagedResource>,
    /// What the config asks for
    pub target: Vec<ManagedResource>,
}

impl Plan {
    /// Discover current state and build the target from `config`
    pub fn build(
        config: &SysmanConfig,
        settings: &Settings,
        only: Option<ResourceKind>,
    ) -> Result<Self> {
        let current = resource::discover(settings)?;
        let target = resource::desired(config, settings);
        log::debug!(
            "plan: {} installed, {} configured",
            current.len(),
            target.len()
        );

        Ok(Self { current, target }.restrict(only))
    }

    /// Keep only resources of `kind` on both sides
    pub fn restrict(self, kind: Option<ResourceKind>) -> Self {
        let Some(kind) = kind else {
            return self;
        };
        let keep = |list: Vec<ManagedResource>| {
            list.into_iter()
                .filter(|r| r.kind() == kind)
                .collect::<Vec<_>>()
        };
        Self {
            current: keep(self.current),
            target: keep(self.target),
        }
    }

    pub fn changes(&self) -> Changes<'_, ManagedResource> {
        reconcile::diff(&self.current, &self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AppImageConfig, FlatpakConfig, SettingsConfig};
    use reconcile::Resource;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_build_and_restrict() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::with_home(tmp.path().to_path_buf(), &SettingsConfig::default());
        settings.ensure_dirs().unwrap();
        fs::write(settings.appimage_dir.join("stale.AppImage"), "elf").unwrap();

        let config = SysmanConfig {
            flatpaks: vec![FlatpakConfig {
                alias: "firefox".into(),
                id: "org.mozilla.firefox".into(),
            }],
            appimages: vec![AppImageConfig {
                alias: "krita".into(),
                url: "https://example.com/krita.AppImage".into(),
            }],
            ..Default::default()
        };

        let plan = Plan::build(&config, &settings, None).unwrap();
        assert_eq!(plan.changes().len(), 3);

        let only = Plan::build(&config, &settings, Some(ResourceKind::AppImage)).unwrap();
        let changes = only.changes();
        assert_eq!(changes.creations.len(), 1);
        assert_eq!(changes.creations[0].describe(), "appimage:krita");
        assert_eq!(changes.removals[0].describe(), "appimage:stale");

        let none = Plan::build(&config, &settings, Some(ResourceKind::Daemon)).unwrap();
        assert!(none.changes().is_empty());
    }
}
