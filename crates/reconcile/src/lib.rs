//! # Reconcile
//!
//! Converge a machine toward a target set of resources.
//!
//! The crate compares a *current* resource list (what exists) with a
//! *target* list (what should exist), derives the minimal set of creations
//! and removals, and applies them in two phases: every creation first, then
//! every removal. Each phase runs on a bounded thread pool and a failing
//! resource never stops the rest of the batch.
//!
//! ## Core Concepts
//!
//! - **Resource**: something with a create/delete lifecycle and an identity
//! - **Changes**: the creation and removal sets computed by [`diff`]
//! - **ReconcileReport**: one [`ResourceOutcome`] per attempted change
//!
//! ## Example
//!
//! ```ignore
//! use reconcile::{ApplyContext, NoProgress, ReconcileOptions, Resource, reconcile};
//!
//! #[derive(Debug)]
//! struct Marker { path: std::path::PathBuf }
//!
//! impl Resource for Marker {
//!     fn resource_type(&self) -> &'static str { "marker" }
//!     fn describe(&self) -> String { format!("marker:{}", self.path.display()) }
//!     fn same_identity(&self, other: &Self) -> bool { self.path == other.path }
//!
//!     fn create(&self, _ctx: &ApplyContext) -> anyhow::Result<()> {
//!         std::fs::write(&self.path, b"")?;
//!         Ok(())
//!     }
//!
//!     fn delete(&self, _ctx: &ApplyContext) -> anyhow::Result<()> {
//!         std::fs::remove_file(&self.path)?;
//!         Ok(())
//!     }
//! }
//!
//! let report = reconcile(
//!     &ApplyContext::default(),
//!     &current,
//!     &target,
//!     &ReconcileOptions::default(),
//!     &NoProgress,
//! )?;
//!
//! if !report.is_success() {
//!     for failure in report.failures() {
//!         eprintln!("{failure}");
//!     }
//! }
//! ```
//!
//! ## Provider Traits
//!
//! - [`Resource`]: implemented by every concrete resource kind
//! - [`ProgressCallback`]: receives phase and per-resource progress

pub mod context;
pub mod diff;
pub mod error;
pub mod executor;
pub mod resource;
pub mod testing;
pub mod types;

// Re-export main types at crate root
pub use context::{ApplyContext, CancelToken, NoProgress, ProgressCallback};
pub use diff::{Changes, creations, diff, removals};
pub use error::{IdentityViolation, ReconcileError};
pub use executor::reconcile;
pub use resource::Resource;
pub use types::{OutcomeStatus, Phase, ReconcileOptions, ReconcileReport, ResourceOutcome, Summary};
