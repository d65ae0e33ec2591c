// ABOUTME: Storage abstraction layer for persisted health plans
// ABOUTME: Plugin architecture with a SQLite backend behind the PlanStore trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Plan Store Abstraction
//!
//! Persistence boundary for generated plans. Implementations must uphold
//! the central data-integrity invariant: **at most one stored plan per
//! user is active at any time**. Saving a new plan deactivates every
//! previously active plan for that user in the same transaction;
//! superseded plans are kept for history, never deleted.
//!
//! The store handle is constructed explicitly at the composition root and
//! injected into the controller. There is no global lazily-initialized
//! connection; tests substitute their own implementations of
//! [`PlanStore`].

pub mod factory;
pub mod sqlite;

use async_trait::async_trait;

use crate::errors::AppResult;
use crate::models::{HealthPlan, StoredPlan};

/// Core plan persistence trait
///
/// All storage backends implement this trait to provide a consistent
/// interface to the controller and the read-side.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Run schema setup
    ///
    /// # Errors
    ///
    /// Returns an error if schema creation fails.
    async fn migrate(&self) -> AppResult<()>;

    /// Persist a plan as the user's new active plan
    ///
    /// Deactivates every previously active plan for `user_id` and inserts
    /// the new plan as active with a server-assigned creation timestamp,
    /// atomically from the caller's perspective. Returns the identifier of
    /// the new record.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan fails validation or the storage
    /// operation fails. A failed save never leaves two active plans.
    async fn save_plan(&self, user_id: &str, plan: &HealthPlan) -> AppResult<String>;

    /// Load the single active plan for a user
    ///
    /// # Errors
    ///
    /// `Ok(None)` means "no active plan" and is not an error. `Err` is
    /// reserved for genuine storage failures, which callers must treat as
    /// distinct from absence.
    async fn load_active_plan(&self, user_id: &str) -> AppResult<Option<StoredPlan>>;

    /// All plans ever saved for a user, newest first
    ///
    /// Includes deactivated plans; used by the read-side and by invariant
    /// checks.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn plan_history(&self, user_id: &str) -> AppResult<Vec<StoredPlan>>;
}
