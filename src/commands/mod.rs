use anyhow::Result;

use crate::Context;
use crate::schema::SysmanConfig;
use crate::settings::Settings;

pub mod config;
pub mod declarative;

/// Load the config file and resolve settings from it
pub fn load(ctx: &Context) -> Result<(SysmanConfig, Settings)> {
    let config = SysmanConfig::load(&ctx.config_path)?;
    let settings = Settings::resolve(&config.settings)?;
    log::debug!("resolved settings: {settings:?}");
    Ok((config, settings))
}
