//! Execution engine for sysman
//!
//! The engine orchestrates:
//! 1. Planning - Discover installed resources and build the target from config
//! 2. Diffing - Show what would be created and removed
//! 3. Executing - Confirm, then hand the plan to the reconcile orchestrator

pub mod differ;
pub mod executor;
pub mod planner;

pub use executor::{ExecuteOptions, execute};
pub use planner::Plan;
