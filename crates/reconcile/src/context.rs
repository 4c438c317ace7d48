//! Apply context, cancellation and progress callbacks
//!
//! These types let the reconcile crate be driven without depending on a
//! specific UI, signal handling or progress implementation.

use crate::types::{Phase, ResourceOutcome};
use anyhow::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared cancellation flag
///
/// Cloning yields a handle to the same flag. Once cancelled it stays
/// cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Context passed to resource create/delete operations
#[derive(Debug, Clone, Default)]
pub struct ApplyContext {
    cancel: CancelToken,
}

impl ApplyContext {
    /// Create a context observing the given cancellation token
    pub fn new(cancel: CancelToken) -> Self {
        Self { cancel }
    }

    /// The cancellation token shared with the caller
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Whether the run has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Fail with an error if the run has been cancelled
    ///
    /// Long-running resources call this between steps so a cancelled run
    /// stops at the next safe point.
    pub fn check_cancelled(&self) -> Result<()> {
        if self.is_cancelled() {
            anyhow::bail!("cancelled");
        }
        Ok(())
    }
}

/// Progress callback for reconciliation
///
/// Methods take `&self` and may be called concurrently from pool threads.
pub trait ProgressCallback: Sync {
    /// Called when a phase starts, with the number of planned changes
    fn on_phase_start(&self, phase: Phase, count: usize);

    /// Called when a single resource has been processed
    fn on_resource_complete(&self, outcome: &ResourceOutcome);

    /// Called once every job of the phase has finished
    fn on_phase_complete(&self, phase: Phase);
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_phase_start(&self, _phase: Phase, _count: usize) {}
    fn on_resource_complete(&self, _outcome: &ResourceOutcome) {}
    fn on_phase_complete(&self, _phase: Phase) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let token = CancelToken::new();
        let ctx = ApplyContext::new(token.clone());
        assert!(!ctx.is_cancelled());
        assert!(ctx.check_cancelled().is_ok());

        token.cancel();

        assert!(ctx.is_cancelled());
        assert!(ctx.cancel_token().is_cancelled());
        let err = ctx.check_cancelled().unwrap_err();
        assert_eq!(err.to_string(), "cancelled");
    }
}
