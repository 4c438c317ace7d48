//! Progress bars for apply runs

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use reconcile::{OutcomeStatus, Phase, ProgressCallback, ResourceOutcome};
use std::sync::{Mutex, MutexGuard};

/// One progress bar per reconcile phase
///
/// Failures are printed above the bar as they happen. A hidden instance
/// draws nothing, for `--json` and `--quiet` runs.
pub struct ApplyProgress {
    bar: Mutex<Option<ProgressBar>>,
    hidden: bool,
}

impl ApplyProgress {
    pub fn new(hidden: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            hidden,
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        match self.bar.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn current(&self) -> Option<ProgressBar> {
        self.slot().clone()
    }
}

fn bar(len: u64, phase: Phase) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("{prefix:>8} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-");
    pb.set_style(style);
    pb.set_prefix(label(phase));
    pb
}

fn label(phase: Phase) -> &'static str {
    match phase {
        Phase::Create => "Creating",
        Phase::Delete => "Removing",
    }
}

impl ProgressCallback for ApplyProgress {
    fn on_phase_start(&self, phase: Phase, count: usize) {
        if count == 0 {
            return;
        }
        let pb = if self.hidden {
            ProgressBar::hidden()
        } else {
            bar(count as u64, phase)
        };
        *self.slot() = Some(pb);
    }

    fn on_resource_complete(&self, outcome: &ResourceOutcome) {
        let Some(pb) = self.current() else {
            return;
        };

        if let OutcomeStatus::Failed { error } = &outcome.status
            && !self.hidden
        {
            pb.suspend(|| {
                println!("  {} {} ({})", "✗".red(), outcome.resource, error);
            });
        }
        pb.set_message(outcome.resource.clone());
        pb.inc(1);
    }

    fn on_phase_complete(&self, _phase: Phase) {
        if let Some(pb) = self.slot().take() {
            pb.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Debug)]
    struct Named(&'static str);

    impl reconcile::Resource for Named {
        fn resource_type(&self) -> &'static str {
            "named"
        }
        fn describe(&self) -> String {
            format!("named:{}", self.0)
        }
        fn same_identity(&self, other: &Self) -> bool {
            self.0 == other.0
        }
        fn create(&self, _ctx: &reconcile::ApplyContext) -> anyhow::Result<()> {
            Ok(())
        }
        fn delete(&self, _ctx: &reconcile::ApplyContext) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_hidden_progress_counts_outcomes() {
        let progress = ApplyProgress::new(true);
        progress.on_phase_start(Phase::Create, 2);

        for name in ["a", "b"] {
            let outcome = ResourceOutcome::new(
                &Named(name),
                Phase::Create,
                OutcomeStatus::Succeeded,
                Duration::ZERO,
            );
            progress.on_resource_complete(&outcome);
        }
        assert_eq!(progress.current().map(|pb| pb.position()), Some(2));

        progress.on_phase_complete(Phase::Create);
        assert!(progress.current().is_none());
    }

    #[test]
    fn test_empty_phase_has_no_bar() {
        let progress = ApplyProgress::new(true);
        progress.on_phase_start(Phase::Delete, 0);
        assert!(progress.current().is_none());
        progress.on_phase_complete(Phase::Delete);
    }
}
