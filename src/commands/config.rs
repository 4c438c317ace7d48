use anyhow::Result;

use crate::Context;
use crate::ui;

pub fn validate(ctx: &Context) -> Result<()> {
    ui::header("Validating Configuration");

    let path = &ctx.config_path;
    ui::kv("File", &path.display().to_string());
    if !path.exists() {
        ui::warn("Config file not found, treating it as empty");
    }

    let (config, settings) = super::load(ctx)?;

    ui::section("Resources");
    ui::kv("daemons", &config.daemons.len().to_string());
    ui::kv("flatpaks", &config.flatpaks.len().to_string());
    ui::kv("appimages", &config.appimages.len().to_string());
    ui::kv("total", &config.resource_count().to_string());

    ui::section("Settings");
    ui::kv("home", &settings.home.display().to_string());
    ui::kv("services_dir", &settings.services_dir.display().to_string());
    ui::kv("systemd_dir", &settings.systemd_dir.display().to_string());
    ui::kv("appimage_dir", &settings.appimage_dir.display().to_string());
    ui::kv("bin_dir", &settings.bin_dir.display().to_string());
    ui::kv(
        "flatpak_exports_dir",
        &settings.flatpak_exports_dir.display().to_string(),
    );
    ui::kv("flatpak_remote", &settings.flatpak_remote);
    ui::kv("jobs", &settings.jobs.to_string());

    println!();
    ui::success("Configuration is valid!");
    Ok(())
}
