//! Two-phase apply orchestrator
//!
//! Creations run first, removals second. Each phase fans its jobs out over
//! a bounded rayon pool and collects one outcome per job before the next
//! phase may start.

use crate::context::{ApplyContext, ProgressCallback};
use crate::diff::diff;
use crate::error::ReconcileError;
use crate::resource::Resource;
use crate::types::{OutcomeStatus, Phase, ReconcileOptions, ReconcileReport, ResourceOutcome};
use anyhow::Context as _;
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// Converge `current` toward `target`
///
/// Computes the creation and removal sets, runs every creation, waits for
/// all of them, then runs every removal. A failing resource is recorded in
/// the report and never stops its siblings or the next phase.
///
/// # Arguments
/// * `ctx` - Context handed to every resource, carries the cancellation token
/// * `current` - Resources observed on the machine
/// * `target` - Resources that should exist
/// * `opts` - Pool width and dry-run flag
/// * `progress` - Progress callback, may be invoked from pool threads
///
/// # Returns
/// One outcome per planned change, creation phase first. Errors only when a
/// worker pool cannot be built.
pub fn reconcile<R, P>(
    ctx: &ApplyContext,
    current: &[R],
    target: &[R],
    opts: &ReconcileOptions,
    progress: &P,
) -> Result<ReconcileReport, ReconcileError>
where
    R: Resource,
    P: ProgressCallback + ?Sized,
{
    let changes = diff(current, target);
    log::info!(
        "reconciling {} current against {} target resources: {} to create, {} to delete",
        current.len(),
        target.len(),
        changes.creations.len(),
        changes.removals.len()
    );

    let mut report = ReconcileReport::default();
    report.extend(run_phase(ctx, Phase::Create, &changes.creations, opts, progress)?);

    if ctx.is_cancelled() && !changes.removals.is_empty() {
        log::warn!("run cancelled, skipping {} deletions", changes.removals.len());
    }
    report.extend(run_phase(ctx, Phase::Delete, &changes.removals, opts, progress)?);

    let summary = report.summary();
    log::info!(
        "reconcile finished: {} created, {} removed, {} failed, {} skipped",
        summary.created,
        summary.removed,
        summary.failed,
        summary.skipped
    );

    Ok(report)
}

/// Run every job of one phase and wait for all of them
fn run_phase<R, P>(
    ctx: &ApplyContext,
    phase: Phase,
    resources: &[&R],
    opts: &ReconcileOptions,
    progress: &P,
) -> Result<Vec<ResourceOutcome>, ReconcileError>
where
    R: Resource,
    P: ProgressCallback + ?Sized,
{
    progress.on_phase_start(phase, resources.len());

    if resources.is_empty() {
        log::debug!("{phase} phase: nothing to do");
        progress.on_phase_complete(phase);
        return Ok(Vec::new());
    }

    log::info!("{phase} phase: {} resources", resources.len());

    let outcomes: Vec<ResourceOutcome> = if opts.dry_run {
        resources
            .iter()
            .map(|resource| {
                let outcome = skipped(*resource, phase, "dry run");
                progress.on_resource_complete(&outcome);
                outcome
            })
            .collect()
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(opts.jobs.max(1))
            .thread_name(move |i| format!("reconcile-{phase}-{i}"))
            .build()
            .map_err(|source| ReconcileError::ThreadPool {
                phase: phase.to_string(),
                source,
            })?;

        pool.install(|| {
            resources
                .par_iter()
                .map(|resource| {
                    let outcome = apply_resource(ctx, phase, *resource);
                    progress.on_resource_complete(&outcome);
                    outcome
                })
                .collect()
        })
    };

    progress.on_phase_complete(phase);
    Ok(outcomes)
}

/// Apply a single resource and record what happened
fn apply_resource<R: Resource>(ctx: &ApplyContext, phase: Phase, resource: &R) -> ResourceOutcome {
    if ctx.is_cancelled() {
        log::debug!("not dispatching {phase} {}: cancelled", resource.describe());
        return skipped(resource, phase, "cancelled");
    }

    let description = resource.describe();
    log::debug!("dispatching {phase} {description}");

    let started = Instant::now();
    let result = match phase {
        Phase::Create => resource.create(ctx),
        Phase::Delete => resource.delete(ctx),
    }
    .with_context(|| format!("{phase} {description}"));
    let elapsed = started.elapsed();

    let status = match result {
        Ok(()) => {
            log::info!("{phase} {description}: ok ({} ms)", elapsed.as_millis());
            OutcomeStatus::Succeeded
        }
        Err(e) => {
            log::error!(
                "resource {phase} failed: type={} resource={} error={:#}",
                resource.resource_type(),
                description,
                e
            );
            OutcomeStatus::Failed {
                error: format!("{e:#}"),
            }
        }
    };

    ResourceOutcome::new(resource, phase, status, elapsed)
}

fn skipped<R: Resource>(resource: &R, phase: Phase, reason: &str) -> ResourceOutcome {
    ResourceOutcome::new(
        resource,
        phase,
        OutcomeStatus::Skipped {
            reason: reason.to_string(),
        },
        Duration::ZERO,
    )
}
