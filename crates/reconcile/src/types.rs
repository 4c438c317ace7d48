//! Core types for reconciliation runs

use crate::resource::Resource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::time::Duration;

/// One of the two sequential stages of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Create every resource missing from the current state
    Create,
    /// Delete every current resource no longer in the target
    Delete,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to a single resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// The operation completed
    Succeeded,
    /// The operation returned an error (message includes resource context)
    Failed { error: String },
    /// The operation was never invoked
    Skipped { reason: String },
}

impl OutcomeStatus {
    /// Check if the status represents success (no failure)
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// Record of one create or delete attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceOutcome {
    /// Type tag of the resource
    pub resource_type: String,
    /// Diagnostic identity of the resource
    pub resource: String,
    /// Phase in which the resource was processed
    pub phase: Phase,
    /// Result of the attempt
    #[serde(flatten)]
    pub status: OutcomeStatus,
    /// Wall-clock time spent in the operation, in milliseconds
    pub elapsed_ms: u64,
}

impl ResourceOutcome {
    /// Build an outcome for a resource
    pub fn new<R: Resource>(
        resource: &R,
        phase: Phase,
        status: OutcomeStatus,
        elapsed: Duration,
    ) -> Self {
        Self {
            resource_type: resource.resource_type().to_string(),
            resource: resource.describe(),
            phase,
            status,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Whether this outcome is a failure
    pub fn is_failure(&self) -> bool {
        !self.status.is_success()
    }
}

impl fmt::Display for ResourceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            OutcomeStatus::Succeeded => write!(f, "{} {}: ok", self.phase, self.resource),
            OutcomeStatus::Failed { error } => {
                write!(f, "{} {}: failed: {}", self.phase, self.resource, error)
            }
            OutcomeStatus::Skipped { reason } => {
                write!(f, "{} {}: skipped ({})", self.phase, self.resource, reason)
            }
        }
    }
}

/// Counts derived from a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub created: usize,
    pub removed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Summary {
    /// Total number of actual changes made
    pub fn total_changes(&self) -> usize {
        self.created + self.removed
    }

    /// Total number of resources processed
    pub fn total(&self) -> usize {
        self.created + self.removed + self.failed + self.skipped
    }

    /// Check if the run was fully successful (no failures)
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Add an outcome to the summary
    pub fn add_outcome(&mut self, outcome: &ResourceOutcome) {
        match (&outcome.status, outcome.phase) {
            (OutcomeStatus::Succeeded, Phase::Create) => self.created += 1,
            (OutcomeStatus::Succeeded, Phase::Delete) => self.removed += 1,
            (OutcomeStatus::Failed { .. }, _) => self.failed += 1,
            (OutcomeStatus::Skipped { .. }, _) => self.skipped += 1,
        }
    }
}

/// Every outcome of a run, creation phase first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub outcomes: Vec<ResourceOutcome>,
}

impl ReconcileReport {
    /// Append the outcomes of a finished phase
    pub fn extend(&mut self, outcomes: impl IntoIterator<Item = ResourceOutcome>) {
        self.outcomes.extend(outcomes);
    }

    /// Outcomes of one phase
    pub fn phase(&self, phase: Phase) -> impl Iterator<Item = &ResourceOutcome> {
        self.outcomes.iter().filter(move |o| o.phase == phase)
    }

    /// Outcomes that failed
    pub fn failures(&self) -> impl Iterator<Item = &ResourceOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }

    /// Count outcomes by kind
    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for outcome in &self.outcomes {
            summary.add_outcome(outcome);
        }
        summary
    }

    /// No resource failed
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| !o.is_failure())
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Options for a reconciliation run
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Record planned changes as skipped without invoking any resource
    pub dry_run: bool,
    /// Worker pool width for each phase
    pub jobs: usize,
}

impl ReconcileOptions {
    /// Host parallelism, falling back to a single worker
    pub fn default_jobs() -> usize {
        std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
    }
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            jobs: Self::default_jobs(),
        }
    }
}
