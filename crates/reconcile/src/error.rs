//! Error types for reconciliation.
//!
//! Per-resource failures are not errors of the run: they are recorded as
//! [`OutcomeStatus::Failed`](crate::OutcomeStatus::Failed) in the report.
//! [`ReconcileError`] covers the few ways a run cannot happen at all.

use thiserror::Error;

/// Errors that prevent a reconciliation run from executing.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The worker pool for a phase could not be built
    #[error("failed to build {phase} worker pool: {source}")]
    ThreadPool {
        /// Phase whose pool failed ("create" or "delete")
        phase: String,
        /// Underlying rayon error
        #[source]
        source: rayon::ThreadPoolBuildError,
    },
}

/// A breach of the identity-equality contract, found by
/// [`check_identity_laws`](crate::testing::check_identity_laws).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityViolation {
    /// `a.same_identity(a)` returned false
    #[error("identity is not reflexive for {resource}")]
    NotReflexive {
        /// The offending resource
        resource: String,
    },

    /// `a.same_identity(b)` differs from `b.same_identity(a)`
    #[error("identity is not symmetric between {left} and {right}")]
    NotSymmetric {
        /// Receiver of the `true` comparison
        left: String,
        /// Argument of the `true` comparison
        right: String,
    },

    /// `a ~ b` and `b ~ c` but not `a ~ c`
    #[error("identity is not transitive across {first}, {second} and {third}")]
    NotTransitive {
        /// First resource of the chain
        first: String,
        /// Middle resource of the chain
        second: String,
        /// Last resource of the chain
        third: String,
    },
}
