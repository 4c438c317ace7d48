//! Apply a plan with confirmation, progress and a printed summary

use anyhow::{Context, Result};
use colored::Colorize;
use reconcile::{
    ApplyContext, OutcomeStatus, Phase, ReconcileOptions, ReconcileReport, ResourceOutcome,
    Summary,
};
use std::time::Duration;

use crate::progress::ApplyProgress;

use super::differ::display_diff;
use super::planner::Plan;

/// Options for one `apply` run
#[derive(Debug, Clone)]
pub struct ExecuteOptions {
    /// Don't make changes, just show what would happen
    pub dry_run: bool,
    /// Number of parallel jobs
    pub jobs: usize,
    /// Skip confirmation prompts
    pub yes: bool,
    /// Print the report as JSON instead of a summary
    pub json: bool,
    /// Draw no progress bars
    pub quiet: bool,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            jobs: ReconcileOptions::default_jobs(),
            yes: false,
            json: false,
            quiet: false,
        }
    }
}

/// Show the diff, confirm, then reconcile
pub fn execute(plan: &Plan, ctx: &ApplyContext, opts: &ExecuteOptions) -> Result<ReconcileReport> {
    let changes = plan.changes();
    if !opts.json {
        display_diff(&changes);
    }

    if changes.is_empty() {
        emit(&ReconcileReport::default(), opts)?;
        return Ok(ReconcileReport::default());
    }

    if !opts.yes && !opts.dry_run && !confirm_proceed()? {
        if !opts.json {
            println!();
            println!("  {} Aborted", "✗".red());
        }
        let mut report = ReconcileReport::default();
        report.extend(aborted(&changes.creations, Phase::Create));
        report.extend(aborted(&changes.removals, Phase::Delete));
        emit(&report, opts)?;
        return Ok(report);
    }

    if !opts.json {
        println!();
        println!(
            "  {} Applying {} changes with {} jobs...",
            "→".cyan(),
            changes.len(),
            opts.jobs
        );
    }

    let progress = ApplyProgress::new(opts.json || opts.quiet);
    let reconcile_opts = ReconcileOptions {
        dry_run: opts.dry_run,
        jobs: opts.jobs,
    };
    let report = reconcile::reconcile(ctx, &plan.current, &plan.target, &reconcile_opts, &progress)?;

    if ctx.is_cancelled() && !opts.json {
        println!();
        println!("  {} Interrupted, remaining changes were skipped", "⚠".yellow());
    }

    emit(&report, opts)?;
    Ok(report)
}

fn aborted<R: reconcile::Resource>(resources: &[&R], phase: Phase) -> Vec<ResourceOutcome> {
    resources
        .iter()
        .map(|r| {
            ResourceOutcome::new(
                *r,
                phase,
                OutcomeStatus::Skipped {
                    reason: "aborted".to_string(),
                },
                Duration::ZERO,
            )
        })
        .collect()
}

fn emit(report: &ReconcileReport, opts: &ExecuteOptions) -> Result<()> {
    if opts.json {
        let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{json}");
    } else if !report.is_empty() {
        print_summary(report, opts.dry_run);
    }
    Ok(())
}

/// Confirm with user
fn confirm_proceed() -> Result<bool> {
    use dialoguer::Confirm;

    let confirmed = Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact()?;

    Ok(confirmed)
}

/// Print final summary
fn print_summary(report: &ReconcileReport, dry_run: bool) {
    let summary: Summary = report.summary();

    println!();
    if dry_run {
        println!("  {} Dry run - no changes made", "ℹ".blue());
    } else if summary.is_success() {
        println!(
            "  {} Configuration applied successfully!",
            "✓".green().bold()
        );
    } else {
        println!(
            "  {} Configuration applied with errors",
            "⚠".yellow().bold()
        );
    }

    if summary.created > 0 {
        println!("    • {} resources created", summary.created);
    }
    if summary.removed > 0 {
        println!("    • {} resources removed", summary.removed);
    }
    if summary.skipped > 0 {
        println!("    • {} resources skipped", summary.skipped);
    }
    if summary.failed > 0 {
        println!("    • {} {} failed", summary.failed, "resources".red());
        for outcome in report.failures() {
            if let OutcomeStatus::Failed { error } = &outcome.status {
                println!("      {} {}: {}", "✗".red(), outcome.resource, error.dimmed());
            }
        }
    }
}
