// ABOUTME: Core data models for profiles, daily logs, and structured health plans
// ABOUTME: UserProfile, DailyLog, HealthPlan hierarchy, StoredPlan, and WeightHistoryPoint definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Core Data Models
//!
//! Serde-backed domain models shared across the storage layer, the planning
//! engine, and the adaptive controller. [`HealthPlan`] is the structured
//! artifact the planning engine must produce; [`HealthPlan::validate`]
//! enforces the day-index invariant before a plan is accepted or persisted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Gender for BMR calculations
///
/// Values other than male/female are preserved as [`Gender::Unspecified`]
/// and leave the BMR gender adjustment at zero. This mirrors the historical
/// behavior of the metrics pipeline and is intentional.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male (+5 kcal BMR adjustment)
    Male,
    /// Female (-161 kcal BMR adjustment)
    Female,
    /// Any other value (no BMR adjustment)
    Unspecified,
}

impl Gender {
    /// Parse gender from free-form text, case-insensitively
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "male" => Self::Male,
            "female" => Self::Female,
            _ => Self::Unspecified,
        }
    }
}

/// Activity level for TDEE calculation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Sedentary (little/no exercise)
    Sedentary,
    /// Lightly active (1-3 days/week)
    LightlyActive,
    /// Moderately active (3-5 days/week)
    ModeratelyActive,
    /// Very active (6-7 days/week)
    VeryActive,
}

impl ActivityLevel {
    /// Parse activity level from free-form text, case-insensitively
    ///
    /// Unrecognized values fall back to [`ActivityLevel::ModeratelyActive`]
    /// (factor 1.55) rather than raising an error, so a misspelled profile
    /// field degrades to a reasonable default instead of halting a cycle.
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "sedentary" => Self::Sedentary,
            "lightly active" => Self::LightlyActive,
            "very active" => Self::VeryActive,
            _ => Self::ModeratelyActive,
        }
    }

    /// The TDEE multiplier for this activity level
    #[must_use]
    pub const fn factor(&self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::LightlyActive => 1.375,
            Self::ModeratelyActive => 1.55,
            Self::VeryActive => 1.725,
        }
    }
}

/// User identity and physiology, owned by the composition root
///
/// Immutable for the duration of a run; the controller never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique user identifier
    pub user_id: String,
    /// Gender for BMR adjustment
    pub gender: Gender,
    /// Age in years
    pub age_years: i32,
    /// Height in centimeters
    pub height_cm: f64,
    /// Activity level for TDEE
    pub activity_level: ActivityLevel,
    /// Goal weight in kilograms
    pub target_weight_kg: f64,
    /// Starting weight in kilograms
    pub initial_weight_kg: f64,
    /// Free-text goal description fed to the planning engine
    pub goal: String,
}

/// One day's health log for a user
///
/// Produced fresh each evaluation cycle by a log provider; this core never
/// persists it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyLog {
    /// User the log belongs to
    pub user_id: String,
    /// Calendar date of the log
    pub date: NaiveDate,
    /// Morning weight in kilograms
    pub weight_kg: f64,
    /// Total calories consumed
    pub calories_consumed: u32,
    /// Calories burned through activity
    pub activity_calories_burned: u32,
    /// Step count
    pub steps: u32,
    /// Free-text summary of the day's meals
    pub meals_summary: String,
}

/// A single meal within a day's plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealItem {
    /// Breakfast, Lunch, Dinner, or Snack
    pub meal_type: String,
    /// A brief, specific meal idea
    pub recipe_suggestion: String,
    /// Estimated calories for this single meal
    pub estimated_kcal: u32,
}

/// The primary physical activity for a day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityItem {
    /// e.g. Cardio, Strength Training, Yoga
    pub activity_type: String,
    /// Suggested duration in minutes
    pub duration_minutes: u32,
    /// Brief description of the goal for this activity
    pub description: String,
}

/// Meals and activity for a single day of the plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPlan {
    /// Day number in the sequence (1, 2, 3, ...)
    pub day: u32,
    /// All meals for the day
    pub meals: Vec<MealItem>,
    /// The primary physical activity for the day
    pub activity: ActivityItem,
}

/// The complete structured plan produced by the planning engine
///
/// The engine must generate output conforming exactly to this shape;
/// anything else is rejected wholesale by [`HealthPlan::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthPlan {
    /// Short, motivational title for the plan
    pub plan_title: String,
    /// Length of the plan in days
    pub duration_days: u32,
    /// Why this plan was generated, in the agent's words
    pub agent_reasoning: String,
    /// One entry per day, indices 1..=duration_days
    pub daily_plans: Vec<DailyPlan>,
}

impl HealthPlan {
    /// Validate the day-index invariant
    ///
    /// Day indices must be exactly `1..=duration_days`: unique, in range,
    /// and present for every day. A plan failing this check is never
    /// persisted.
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::ErrorCode::InvalidFormat`] describing the
    /// first violation found.
    pub fn validate(&self) -> AppResult<()> {
        if self.duration_days == 0 {
            return Err(AppError::invalid_format("plan duration must be at least 1 day"));
        }
        let duration = self.duration_days as usize;
        if self.daily_plans.len() != duration {
            return Err(AppError::invalid_format(format!(
                "plan covers {} days but duration_days is {}",
                self.daily_plans.len(),
                self.duration_days
            )));
        }
        let mut seen = vec![false; duration];
        for daily in &self.daily_plans {
            let day = daily.day as usize;
            if day == 0 || day > duration {
                return Err(AppError::invalid_format(format!(
                    "day index {} outside 1..={}",
                    daily.day, self.duration_days
                )));
            }
            if seen[day - 1] {
                return Err(AppError::invalid_format(format!(
                    "duplicate day index {}",
                    daily.day
                )));
            }
            seen[day - 1] = true;
        }
        Ok(())
    }
}

/// A persisted plan with its storage metadata
///
/// Plan fields are flattened so the serialized document matches the stored
/// shape: `{user_id, created_at, is_active, plan_title, ...}`. At most one
/// stored plan per user is active at any time; superseded plans are
/// deactivated, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPlan {
    /// Storage-assigned record identifier
    pub id: String,
    /// Owner of the plan
    pub user_id: String,
    /// Server-assigned creation timestamp
    pub created_at: DateTime<Utc>,
    /// Whether this is the user's authoritative plan
    pub is_active: bool,
    /// The plan itself
    #[serde(flatten)]
    pub plan: HealthPlan,
}

/// One week of the synthetic weight-history series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightHistoryPoint {
    /// Week number, starting at 1
    pub week: u32,
    /// Date the week ends on
    pub date: NaiveDate,
    /// Simulated measured weight
    pub actual_weight_kg: f64,
    /// Ideal weight on the 0.5 kg/week loss trend
    pub target_trend_kg: f64,
}
