// ABOUTME: Synthetic health-log provider for development and testing
// ABOUTME: Deterministic per (user, date) log generation plus the synthetic weight-history series
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Synthetic Log Provider
//!
//! Generates plausible daily health logs without any wearable or API
//! dependency. Logs are deterministic per `(user_id, date)` pair: the RNG
//! is seeded from a hash of both, so repeated fetches within a day (and
//! test assertions) see identical values.
//!
//! The module also hosts [`generate_weight_history`], the synthetic weekly
//! series the read-side renders as a progress chart: a fixed 0.5 kg/week
//! target trend with bounded fluctuation that widens as the weeks pass.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::debug;

use super::DailyLogProvider;
use crate::errors::AppResult;
use crate::models::{DailyLog, WeightHistoryPoint};

/// Weekly weight-loss step of the target trend, in kilograms
const TARGET_WEEKLY_LOSS_KG: f64 = 0.5;

/// Fixed meals summary attached to every synthetic log
const MEALS_SUMMARY: &str = "Breakfast: Eggs & Avocado (400 kcal). \
    Lunch: Chicken Rice (700 kcal). Dinner: Steak & Veggies (800 kcal). \
    Snacks: 2 protein bars (500 kcal total).";

/// Synthetic daily-log provider
///
/// Stands in for a wearable/API integration during development, CI, and
/// demonstrations. Weight values fluctuate around a configured starting
/// weight.
#[derive(Debug, Clone)]
pub struct SyntheticLogProvider {
    /// Baseline weight the generated values fluctuate around
    starting_weight_kg: f64,
}

impl SyntheticLogProvider {
    /// Create a provider fluctuating around the given starting weight
    #[must_use]
    pub const fn new(starting_weight_kg: f64) -> Self {
        Self { starting_weight_kg }
    }

    /// Seed an RNG deterministically from a user/date pair
    fn seeded_rng(user_id: &str, date: NaiveDate) -> ChaCha8Rng {
        let mut hasher = DefaultHasher::new();
        user_id.hash(&mut hasher);
        date.hash(&mut hasher);
        ChaCha8Rng::seed_from_u64(hasher.finish())
    }
}

impl Default for SyntheticLogProvider {
    fn default() -> Self {
        Self::new(85.0)
    }
}

#[async_trait]
impl DailyLogProvider for SyntheticLogProvider {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    async fn get_daily_logs(&self, user_id: &str, date: NaiveDate) -> AppResult<DailyLog> {
        let mut rng = Self::seeded_rng(user_id, date);

        let weight_kg =
            ((self.starting_weight_kg + rng.gen_range(-1.0..=1.0)) * 10.0).round() / 10.0;
        let log = DailyLog {
            user_id: user_id.to_owned(),
            date,
            weight_kg,
            calories_consumed: rng.gen_range(2000..=2600),
            activity_calories_burned: rng.gen_range(400..=800),
            steps: rng.gen_range(6000..=14000),
            meals_summary: MEALS_SUMMARY.to_owned(),
        };

        debug!("Synthetic logs generated for {user_id} on {date}");
        Ok(log)
    }
}

/// Generate the synthetic weekly weight history used by the read-side chart
///
/// `target_trend_kg` decreases by exactly 0.5 kg per week from
/// `initial_weight`; `actual_weight_kg` fluctuates around the trend within
/// ±0.4 kg, widened by 10% per elapsed week. Fluctuation is seeded per
/// user so the series is stable across renders, and dates count back from
/// today so the final point is the current week.
#[must_use]
pub fn generate_weight_history(
    user_id: &str,
    initial_weight: f64,
    weeks: u32,
) -> Vec<WeightHistoryPoint> {
    let mut hasher = DefaultHasher::new();
    user_id.hash(&mut hasher);
    let mut rng = ChaCha8Rng::seed_from_u64(hasher.finish());

    let today = Utc::now().date_naive();
    let mut history = Vec::with_capacity(weeks as usize);

    for i in 0..weeks {
        let ideal_weight = TARGET_WEEKLY_LOSS_KG.mul_add(-f64::from(i + 1), initial_weight);
        let fluctuation = rng.gen_range(-0.4..=0.4) * 0.1f64.mul_add(f64::from(i), 1.0);
        let actual_weight = ((ideal_weight + fluctuation) * 100.0).round() / 100.0;

        history.push(WeightHistoryPoint {
            week: i + 1,
            date: today - Duration::weeks(i64::from(weeks - i)),
            actual_weight_kg: actual_weight,
            target_trend_kg: (ideal_weight * 100.0).round() / 100.0,
        });
    }

    debug!("Generated {weeks} weeks of synthetic history for user {user_id}");
    history
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_logs_are_deterministic_per_user_and_date() {
        let provider = SyntheticLogProvider::default();
        let a = provider
            .get_daily_logs("demo-user", date("2025-06-01"))
            .await
            .unwrap();
        let b = provider
            .get_daily_logs("demo-user", date("2025-06-01"))
            .await
            .unwrap();
        assert!((a.weight_kg - b.weight_kg).abs() < f64::EPSILON);
        assert_eq!(a.calories_consumed, b.calories_consumed);
        assert_eq!(a.steps, b.steps);
    }

    #[tokio::test]
    async fn test_different_dates_vary_logs() {
        let provider = SyntheticLogProvider::default();
        let a = provider
            .get_daily_logs("demo-user", date("2025-06-01"))
            .await
            .unwrap();
        let b = provider
            .get_daily_logs("demo-user", date("2025-06-02"))
            .await
            .unwrap();
        // Not all fields can collide across two independent seeds.
        assert!(
            a.calories_consumed != b.calories_consumed
                || a.steps != b.steps
                || (a.weight_kg - b.weight_kg).abs() > f64::EPSILON
        );
    }

    #[tokio::test]
    async fn test_log_values_stay_in_range() {
        let provider = SyntheticLogProvider::default();
        for day in 1..=28 {
            let log = provider
                .get_daily_logs("range-user", date(&format!("2025-02-{day:02}")))
                .await
                .unwrap();
            assert!((84.0..=86.0).contains(&log.weight_kg));
            assert!((2000..=2600).contains(&log.calories_consumed));
            assert!((400..=800).contains(&log.activity_calories_burned));
            assert!((6000..=14000).contains(&log.steps));
        }
    }

    #[test]
    fn test_history_target_trend_steps_down_half_kilo() {
        let history = generate_weight_history("demo-user", 85.0, 12);
        assert_eq!(history.len(), 12);
        for (i, point) in history.iter().enumerate() {
            let expected = 85.0 - 0.5 * (i as f64 + 1.0);
            assert!((point.target_trend_kg - expected).abs() < 1e-9);
            assert_eq!(point.week, i as u32 + 1);
        }
    }

    #[test]
    fn test_history_trend_is_strictly_decreasing() {
        let history = generate_weight_history("demo-user", 85.0, 12);
        for pair in history.windows(2) {
            assert!(pair[1].target_trend_kg < pair[0].target_trend_kg);
        }
    }

    #[test]
    fn test_history_dates_are_ordered() {
        let history = generate_weight_history("demo-user", 85.0, 6);
        for pair in history.windows(2) {
            assert!(pair[1].date > pair[0].date);
        }
    }
}
