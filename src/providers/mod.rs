// ABOUTME: Daily log provider abstraction for health data access
// ABOUTME: Defines the DailyLogProvider trait implemented by synthetic and future wearable sources
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Log Provider Interface
//!
//! The adaptive controller consumes daily health logs through the
//! [`DailyLogProvider`] trait so the data source can be swapped without
//! touching the control flow. The shipped implementation is
//! [`SyntheticLogProvider`]; a production deployment would put a wearable
//! or nutrition-API client behind the same trait.

pub mod synthetic;

pub use synthetic::{generate_weight_history, SyntheticLogProvider};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::AppResult;
use crate::models::DailyLog;

/// Source of daily health logs for a user
#[async_trait]
pub trait DailyLogProvider: Send + Sync {
    /// Unique provider identifier (e.g. "synthetic", "terra")
    fn name(&self) -> &'static str;

    /// Fetch the log for one user/date pair
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying source cannot produce a log;
    /// the controller treats this as cycle-terminal.
    async fn get_daily_logs(&self, user_id: &str, date: NaiveDate) -> AppResult<DailyLog>;
}
