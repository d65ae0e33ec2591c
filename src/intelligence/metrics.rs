// ABOUTME: Energy metrics calculations using the Mifflin-St Jeor equation
// ABOUTME: BMR, TDEE, and calorie-deficit target derivation from body metrics
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Energy Metrics Calculator
//!
//! Evidence-based energy expenditure estimates:
//!
//! - Mifflin, M.D., et al. (1990). A new predictive equation for resting
//!   energy expenditure. *American Journal of Clinical Nutrition*, 51(2),
//!   241-247. <https://doi.org/10.1093/ajcn/51.2.241>
//! - Activity factors per `McArdle` et al. (2010), Exercise Physiology.
//!
//! Pure and deterministic: same inputs always produce identical output,
//! no I/O, safe to call concurrently without synchronization.

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::models::{ActivityLevel, Gender};

/// BMR adjustment for male users (Mifflin-St Jeor)
const MALE_ADJUST: f64 = 5.0;

/// BMR adjustment for female users (Mifflin-St Jeor)
const FEMALE_ADJUST: f64 = -161.0;

/// Daily calorie deficit targeted for steady weight loss
const TARGET_DEFICIT_KCAL: f64 = 500.0;

/// Derived energy metrics for one user on one day
///
/// Recomputed on demand from the profile and the latest daily log;
/// never cached or persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Metrics {
    /// Basal Metabolic Rate in kcal/day (raw Mifflin-St Jeor value)
    pub bmr_kcal: f64,
    /// Total Daily Energy Expenditure, rounded to whole kcal
    pub tdee_kcal: f64,
    /// Daily intake target for weight loss: rounded TDEE minus the deficit
    pub target_weight_loss_kcal: f64,
    /// The activity multiplier actually applied, for auditability
    pub activity_factor_used: f64,
}

/// Calculate BMR, TDEE, and the weight-loss calorie target
///
/// BMR uses Mifflin-St Jeor: `10*weight + 6.25*height - 5*age`, adjusted
/// `+5` for male and `-161` for female. [`Gender::Unspecified`] leaves the
/// adjustment at zero. The activity factor comes from the profile's
/// [`ActivityLevel`]; unknown textual levels have already collapsed to the
/// 1.55 moderate default during parsing, so no error path exists here for
/// them.
///
/// # Errors
///
/// Returns [`crate::errors::ErrorCode::InvalidInput`] if weight, height,
/// or age is not a positive number. The error is propagated, never
/// swallowed; callers decide how a failed evaluation biases the cycle.
pub fn calculate_metrics(
    weight_kg: f64,
    height_cm: f64,
    age_years: i32,
    gender: Gender,
    activity_level: ActivityLevel,
) -> AppResult<Metrics> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(AppError::invalid_input(
            "weight_kg must be a positive number",
        ));
    }
    if !height_cm.is_finite() || height_cm <= 0.0 {
        return Err(AppError::invalid_input(
            "height_cm must be a positive number",
        ));
    }
    if age_years <= 0 {
        return Err(AppError::invalid_input(
            "age_years must be a positive number",
        ));
    }

    let weight_component = 10.0 * weight_kg;
    let height_component = 6.25 * height_cm;
    let age_component = -5.0 * f64::from(age_years);
    let gender_adjust = match gender {
        Gender::Male => MALE_ADJUST,
        Gender::Female => FEMALE_ADJUST,
        Gender::Unspecified => 0.0,
    };

    let bmr = weight_component + height_component + age_component + gender_adjust;

    let factor = activity_level.factor();
    let tdee = (bmr * factor).round();
    let target_lose = tdee - TARGET_DEFICIT_KCAL;

    Ok(Metrics {
        bmr_kcal: bmr,
        tdee_kcal: tdee,
        target_weight_loss_kcal: target_lose,
        activity_factor_used: factor,
    })
}
