//! Daemon resource - a systemd user service with its own working directory

use anyhow::{Context, Result};
use reconcile::{ApplyContext, Resource};
use std::fs;
use std::path::{Path, PathBuf};

use crate::schema::DaemonConfig;
use crate::settings::Settings;
use crate::{fsops, runner};

/// Prefix marking units owned by sysman
const UNIT_PREFIX: &str = "sysman.";
const UNIT_SUFFIX: &str = ".service";

/// A supervised background service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Daemon {
    /// Path-safe name with no spaces
    pub id: String,
    pub description: String,
    /// Command line relative to the working directory
    pub exec_start: String,
    systemd_dir: PathBuf,
    services_dir: PathBuf,
}

impl Daemon {
    pub fn new(config: &DaemonConfig, settings: &Settings) -> Self {
        Self {
            id: config.id.clone(),
            description: config.description.clone(),
            exec_start: config.exec_start.clone(),
            systemd_dir: settings.systemd_dir.clone(),
            services_dir: settings.services_dir.clone(),
        }
    }

    /// Unit file name, e.g. `sysman.web.service`
    pub fn unit_name(&self) -> String {
        format!("{UNIT_PREFIX}{}{UNIT_SUFFIX}", self.id)
    }

    pub fn unit_path(&self) -> PathBuf {
        self.systemd_dir.join(self.unit_name())
    }

    pub fn working_dir(&self) -> PathBuf {
        self.services_dir.join(&self.id)
    }

    /// Render the systemd unit
    pub fn render_unit(&self) -> String {
        let wd = self.working_dir();
        format!(
            "[Unit]\n\
             Description={}\n\
             \n\
             [Service]\n\
             Type=simple\n\
             TimeoutStartSec=0\n\
             ExecStart={}/{}\n\
             WorkingDirectory={}\n\
             \n\
             [Install]\n\
             WantedBy=default.target\n",
            self.description,
            wd.display(),
            self.exec_start,
            wd.display()
        )
    }

    /// Find every sysman-owned unit in the systemd user directory
    pub fn discover(settings: &Settings) -> Result<Vec<Self>> {
        let dir = &settings.systemd_dir;
        if !dir.is_dir() {
            log::debug!("{} does not exist, no daemons installed", dir.display());
            return Ok(Vec::new());
        }

        let entries =
            fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;

        let mut daemons = Vec::new();
        for entry in entries {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(id) = file_name
                .to_str()
                .and_then(|name| name.strip_prefix(UNIT_PREFIX))
                .and_then(|name| name.strip_suffix(UNIT_SUFFIX))
            else {
                continue;
            };
            if id.is_empty() {
                continue;
            }

            let content = fs::read_to_string(entry.path())
                .with_context(|| format!("Failed to read unit {}", entry.path().display()))?;
            daemons.push(Self::from_unit(id, &content, settings));
        }

        daemons.sort_by(|a, b| a.id.cmp(&b.id));
        log::debug!("discovered {} daemons in {}", daemons.len(), dir.display());
        Ok(daemons)
    }

    /// Rebuild a daemon from an installed unit file
    fn from_unit(id: &str, content: &str, settings: &Settings) -> Self {
        let mut daemon = Self {
            id: id.to_string(),
            description: String::new(),
            exec_start: String::new(),
            systemd_dir: settings.systemd_dir.clone(),
            services_dir: settings.services_dir.clone(),
        };

        let wd = daemon.working_dir();
        for line in content.lines() {
            if let Some(value) = line.strip_prefix("Description=") {
                daemon.description = value.to_string();
            } else if let Some(value) = line.strip_prefix("ExecStart=") {
                daemon.exec_start = relative_command(&wd, value);
            }
        }
        daemon
    }
}

/// Strip the working directory prefix from an ExecStart value
fn relative_command(wd: &Path, exec_start: &str) -> String {
    let prefix = format!("{}/", wd.display());
    exec_start
        .strip_prefix(&prefix)
        .unwrap_or(exec_start)
        .to_string()
}

impl Daemon {
    /// Write the unit, then hand it to `activate`. A unit that fails to
    /// activate is removed again so it is not discovered as installed.
    fn install<F>(&self, ctx: &ApplyContext, activate: F) -> Result<()>
    where
        F: FnOnce(&str) -> Result<()>,
    {
        ctx.check_cancelled()?;

        let path = self.unit_path();
        fsops::create_dir(&self.working_dir())?;
        fsops::write_file(&path, self.render_unit().as_bytes(), 0o644)?;

        let Err(err) = activate(&self.unit_name()) else {
            return Ok(());
        };

        if let Err(e) = fsops::remove_file(&path) {
            log::warn!("remove unit {}: {:#}", path.display(), e);
        } else if let Err(e) = runner::systemctl_user(&["daemon-reload"]) {
            log::warn!("daemon-reload after failed install: {:#}", e);
        }
        Err(err)
    }
}

impl Resource for Daemon {
    fn resource_type(&self) -> &'static str {
        "daemon"
    }

    fn describe(&self) -> String {
        format!("daemon:{}", self.id)
    }

    fn same_identity(&self, other: &Self) -> bool {
        self.id == other.id
    }

    fn create(&self, ctx: &ApplyContext) -> Result<()> {
        self.install(ctx, |unit| {
            runner::systemctl_user(&["daemon-reload"])?;
            ctx.check_cancelled()?;
            runner::systemctl_user(&["enable", unit])?;
            runner::systemctl_user(&["start", unit])
        })
    }

    fn delete(&self, _ctx: &ApplyContext) -> Result<()> {
        let unit = self.unit_name();

        runner::systemctl_user(&["stop", &unit])?;
        runner::systemctl_user(&["disable", &unit])?;
        fsops::remove_file(&self.unit_path())?;

        let wd = self.working_dir();
        if wd.exists()
            && let Err(e) = fsops::remove_dir(&wd)
        {
            log::warn!("remove service dir {}: {:#}", wd.display(), e);
        }

        runner::systemctl_user(&["daemon-reload"])?;
        Ok(())
    }
}
