//! Resource trait for reconciliation
//!
//! A Resource is one manageable unit of machine state (a supervised
//! service, an installed application, a downloaded binary) that can be
//! created and deleted, and that knows whether another value of its own
//! type refers to the same logical thing.

use crate::context::ApplyContext;
use anyhow::Result;
use std::fmt;

/// Core trait for reconcilable resources
///
/// Identity is expressed through [`resource_type`](Resource::resource_type)
/// and [`same_identity`](Resource::same_identity). The diff engine only
/// calls `same_identity` on two values that report the same type tag, and
/// the `&Self` signature keeps unrelated concrete types from ever being
/// compared. Lists mixing several kinds are modelled as an enum over those
/// kinds.
///
/// # Example
///
/// ```ignore
/// use reconcile::{ApplyContext, Resource};
///
/// #[derive(Debug)]
/// struct Package { name: String, version: String }
///
/// impl Resource for Package {
///     fn resource_type(&self) -> &'static str {
///         "package"
///     }
///
///     fn describe(&self) -> String {
///         format!("package:{}", self.name)
///     }
///
///     // The version is state, not identity
///     fn same_identity(&self, other: &Self) -> bool {
///         self.name == other.name
///     }
///
///     fn create(&self, _ctx: &ApplyContext) -> anyhow::Result<()> {
///         install(&self.name, &self.version)
///     }
///
///     fn delete(&self, _ctx: &ApplyContext) -> anyhow::Result<()> {
///         uninstall(&self.name)
///     }
/// }
/// ```
pub trait Resource: Send + Sync + fmt::Debug {
    /// Stable identifier for the kind of resource
    ///
    /// Examples: "daemon", "flatpak", "appimage"
    fn resource_type(&self) -> &'static str;

    /// Human-readable identity, used in logs and outcome records only
    fn describe(&self) -> String;

    /// Whether `other` is the same logical resource as `self`
    ///
    /// This is identity, not full-state equality. It must be an
    /// equivalence relation: reflexive, symmetric and transitive. Use
    /// [`check_identity_laws`](crate::testing::check_identity_laws) in the
    /// kind's tests.
    fn same_identity(&self, other: &Self) -> bool;

    /// Establish the resource
    ///
    /// Only called for resources absent from the current state; the
    /// implementation does not need to re-check presence. Return the bare
    /// domain error, the orchestrator adds the resource context.
    fn create(&self, ctx: &ApplyContext) -> Result<()>;

    /// Reverse the effect of [`create`](Resource::create)
    fn delete(&self, ctx: &ApplyContext) -> Result<()>;
}

/// Type tag check followed by identity comparison
///
/// The receiver is always the current-state member so creation and removal
/// sets are computed with the same comparison direction.
pub(crate) fn matches<R: Resource>(current: &R, target: &R) -> bool {
    current.resource_type() == target.resource_type() && current.same_identity(target)
}
