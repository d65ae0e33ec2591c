// ABOUTME: Shared test utilities and fixtures for integration tests
// ABOUTME: Provides logging setup, an in-memory plan store, and plan/profile fixtures
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(dead_code, missing_docs, clippy::unwrap_used)]

//! Shared test utilities for `coach_agent` integration tests.

use std::sync::Once;

use coach_agent::database_plugins::factory::Database;
use coach_agent::database_plugins::PlanStore;
use coach_agent::models::{
    ActivityItem, ActivityLevel, DailyPlan, Gender, HealthPlan, MealItem, UserProfile,
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .init();
    });
}

/// Standard in-memory plan store setup
pub async fn create_test_database() -> Database {
    init_test_logging();
    let database = Database::new("sqlite::memory:").await.unwrap();
    database.migrate().await.unwrap();
    database
}

/// Reference profile: 70 kg frame, target intake 2056 kcal/day
pub fn test_profile() -> UserProfile {
    UserProfile {
        user_id: "test-user".into(),
        gender: Gender::Male,
        age_years: 30,
        height_cm: 175.0,
        activity_level: ActivityLevel::ModeratelyActive,
        target_weight_kg: 65.0,
        initial_weight_kg: 70.0,
        goal: "Lose 5 kg steadily".into(),
    }
}

/// A valid plan fixture with the given title and duration
pub fn sample_plan(title: &str, duration_days: u32) -> HealthPlan {
    HealthPlan {
        plan_title: title.into(),
        duration_days,
        agent_reasoning: "Test fixture plan".into(),
        daily_plans: (1..=duration_days)
            .map(|day| DailyPlan {
                day,
                meals: vec![
                    MealItem {
                        meal_type: "Breakfast".into(),
                        recipe_suggestion: "Greek yogurt with honey and walnuts".into(),
                        estimated_kcal: 400,
                    },
                    MealItem {
                        meal_type: "Dinner".into(),
                        recipe_suggestion: "Grilled salmon with vegetables".into(),
                        estimated_kcal: 650,
                    },
                ],
                activity: ActivityItem {
                    activity_type: "Cardio".into(),
                    duration_minutes: 30,
                    description: "Steady-state jog".into(),
                },
            })
            .collect(),
    }
}
