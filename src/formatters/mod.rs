// ABOUTME: Plain-text rendering of stored plans and weight history for the CLI read-side
// ABOUTME: Formats plan overviews, per-day schedules, and the progress table
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Text Formatters
//!
//! The presentation client here is a terminal: these helpers turn stored
//! plans and the synthetic progress series into readable text. They only
//! read persisted data and never mutate anything.

use std::fmt::Write as _;

use crate::models::{StoredPlan, WeightHistoryPoint};

/// Render a stored plan as human-readable text
#[must_use]
pub fn format_plan(stored: &StoredPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", stored.plan.plan_title);
    let _ = writeln!(out, "Duration: {} days", stored.plan.duration_days);
    let _ = writeln!(
        out,
        "Created: {} (active: {})",
        stored.created_at.format("%Y-%m-%d %H:%M UTC"),
        if stored.is_active { "yes" } else { "no" }
    );
    let _ = writeln!(out, "Rationale: {}", stored.plan.agent_reasoning);

    for daily in &stored.plan.daily_plans {
        let _ = writeln!(out, "\nDay {}", daily.day);
        for meal in &daily.meals {
            let _ = writeln!(
                out,
                "  {} - {} (~{} kcal)",
                meal.meal_type, meal.recipe_suggestion, meal.estimated_kcal
            );
        }
        let _ = writeln!(
            out,
            "  Activity: {} for {} min - {}",
            daily.activity.activity_type,
            daily.activity.duration_minutes,
            daily.activity.description
        );
    }
    out
}

/// Render the weight history as an aligned table
#[must_use]
pub fn format_history(history: &[WeightHistoryPoint]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<6}{:<12}{:>12}{:>12}", "Week", "Date", "Actual", "Target");
    for point in history {
        let _ = writeln!(
            out,
            "{:<6}{:<12}{:>11.2}{:>11.2}",
            point.week,
            point.date.format("%Y-%m-%d"),
            point.actual_weight_kg,
            point.target_trend_kg
        );
    }
    out
}
