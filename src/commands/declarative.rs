//! Declarative commands
//!
//! - `status` - Show installed resources next to configured ones
//! - `apply` - Make installed resources match the config
//! - `diff` - Preview what apply would change

use anyhow::{Result, bail};
use reconcile::{ApplyContext, CancelToken};

use crate::Context;
use crate::cli::{ApplyArgs, DiffArgs};
use crate::engine::{self, ExecuteOptions, Plan, differ};
use crate::signal;
use crate::ui;

pub fn apply(ctx: &Context, args: ApplyArgs) -> Result<()> {
    let (config, settings) = super::load(ctx)?;

    let jobs = args.jobs.unwrap_or(settings.jobs);
    if jobs == 0 {
        bail!("--jobs must be at least 1");
    }

    if !args.dry_run {
        settings.ensure_dirs()?;
    }

    let plan = Plan::build(&config, &settings, args.only)?;

    let token = CancelToken::new();
    signal::cancel_on_interrupt(token.clone())?;
    let apply_ctx = ApplyContext::new(token);

    let opts = ExecuteOptions {
        dry_run: args.dry_run,
        jobs,
        yes: args.yes,
        json: args.json,
        quiet: ctx.quiet,
    };
    let report = engine::execute(&plan, &apply_ctx, &opts)?;

    if !report.is_success() {
        let failed = report.summary().failed;
        bail!("{failed} resource(s) failed to apply");
    }
    Ok(())
}

pub fn diff(ctx: &Context, args: DiffArgs) -> Result<()> {
    let (config, settings) = super::load(ctx)?;
    let plan = Plan::build(&config, &settings, args.only)?;
    differ::display_diff(&plan.changes());
    Ok(())
}

pub fn status(ctx: &Context) -> Result<()> {
    let (config, settings) = super::load(ctx)?;
    let plan = Plan::build(&config, &settings, None)?;

    ui::header("sysman status");
    ui::kv("Config", &ctx.config_path.display().to_string());
    differ::display_status(&plan);
    Ok(())
}
