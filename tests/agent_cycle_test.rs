// ABOUTME: Integration tests for the adaptive controller cycle
// ABOUTME: Exercises fetch/evaluate/replan paths with trait doubles for store, logs, and planner
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use coach_agent::agent::AdaptiveController;
use coach_agent::database_plugins::PlanStore;
use coach_agent::errors::{AppError, AppResult, ErrorCode};
use coach_agent::llm::{PlanningEngine, PlanningRequest};
use coach_agent::models::{DailyLog, HealthPlan, StoredPlan};
use coach_agent::providers::DailyLogProvider;
use common::{init_test_logging, sample_plan, test_profile};

// ============================================================================
// Trait doubles
// ============================================================================

/// In-memory plan store with injectable failures
#[derive(Default)]
struct MemoryStore {
    plans: Mutex<Vec<StoredPlan>>,
    fail_load: Option<ErrorCode>,
    fail_save: Option<ErrorCode>,
    saves: AtomicUsize,
}

impl MemoryStore {
    fn with_active_plan(plan: HealthPlan, user_id: &str) -> Self {
        let store = Self::default();
        store.plans.lock().unwrap().push(StoredPlan {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_owned(),
            created_at: Utc::now(),
            is_active: true,
            plan,
        });
        store
    }

    fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn active_count(&self, user_id: &str) -> usize {
        self.plans
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.user_id == user_id && p.is_active)
            .count()
    }
}

#[async_trait]
impl PlanStore for MemoryStore {
    async fn migrate(&self) -> AppResult<()> {
        Ok(())
    }

    async fn save_plan(&self, user_id: &str, plan: &HealthPlan) -> AppResult<String> {
        if let Some(code) = self.fail_save {
            return Err(AppError::new(code, "injected save failure"));
        }
        plan.validate()?;
        self.saves.fetch_add(1, Ordering::SeqCst);

        let mut plans = self.plans.lock().unwrap();
        for stored in plans.iter_mut().filter(|p| p.user_id == user_id) {
            stored.is_active = false;
        }
        let id = Uuid::new_v4().to_string();
        plans.push(StoredPlan {
            id: id.clone(),
            user_id: user_id.to_owned(),
            created_at: Utc::now(),
            is_active: true,
            plan: plan.clone(),
        });
        Ok(id)
    }

    async fn load_active_plan(&self, user_id: &str) -> AppResult<Option<StoredPlan>> {
        if let Some(code) = self.fail_load {
            return Err(AppError::new(code, "injected load failure"));
        }
        Ok(self
            .plans
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_id == user_id && p.is_active)
            .cloned())
    }

    async fn plan_history(&self, user_id: &str) -> AppResult<Vec<StoredPlan>> {
        let mut plans: Vec<_> = self
            .plans
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        plans.reverse();
        Ok(plans)
    }
}

/// Log provider returning one fixed log, or failing
struct FixedLogs {
    calories_consumed: u32,
    steps: u32,
    fail: bool,
}

impl FixedLogs {
    const fn new(calories_consumed: u32, steps: u32) -> Self {
        Self {
            calories_consumed,
            steps,
            fail: false,
        }
    }

    const fn failing() -> Self {
        Self {
            calories_consumed: 0,
            steps: 0,
            fail: true,
        }
    }
}

#[async_trait]
impl DailyLogProvider for FixedLogs {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn get_daily_logs(&self, user_id: &str, date: NaiveDate) -> AppResult<DailyLog> {
        if self.fail {
            return Err(AppError::external_service("wearable", "injected outage"));
        }
        Ok(DailyLog {
            user_id: user_id.to_owned(),
            date,
            weight_kg: 70.0,
            calories_consumed: self.calories_consumed,
            activity_calories_burned: 500,
            steps: self.steps,
            meals_summary: "Fixture meals".into(),
        })
    }
}

/// Planning engine returning a canned plan, or failing with a given kind
struct CannedPlanner {
    plan: HealthPlan,
    fail_code: Option<ErrorCode>,
    calls: AtomicUsize,
}

impl CannedPlanner {
    fn returning(plan: HealthPlan) -> Self {
        Self {
            plan,
            fail_code: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing(code: ErrorCode) -> Self {
        Self {
            plan: sample_plan("unused", 1),
            fail_code: Some(code),
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlanningEngine for CannedPlanner {
    fn name(&self) -> &'static str {
        "canned"
    }

    fn display_name(&self) -> &'static str {
        "Canned Planner"
    }

    fn default_model(&self) -> &str {
        "canned-1"
    }

    async fn generate_plan(&self, _request: &PlanningRequest) -> AppResult<HealthPlan> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fail_code {
            Some(code) => Err(AppError::new(code, "injected planning failure")),
            None => Ok(self.plan.clone()),
        }
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

// ============================================================================
// Evaluation scenarios
// ============================================================================

// Fixture numbers: 70 kg, 175 cm, 30 y male, moderately active
// => TDEE 2556 kcal, weight-loss target 2056 kcal/day.

#[tokio::test]
async fn test_no_active_plan_triggers_initial_planning() {
    init_test_logging();
    let store = MemoryStore::default();
    let logs = FixedLogs::new(1900, 8000);
    let planner = CannedPlanner::returning(sample_plan("Initial plan", 7));

    let controller = AdaptiveController::new(&store, &logs, &planner, test_profile());
    let outcome = controller.run().await;

    assert_eq!(
        outcome.progress_report,
        "No active plan found. Initial plan required."
    );
    assert!(outcome.new_plan.is_some());
    assert!(!outcome.replan_needed);
    assert_eq!(planner.call_count(), 1);
    assert_eq!(store.save_count(), 1);
    assert_eq!(store.active_count("test-user"), 1);
}

#[tokio::test]
async fn test_calorie_overshoot_raises_compliance_alert() {
    init_test_logging();
    let store = MemoryStore::with_active_plan(sample_plan("Current", 7), "test-user");
    // 3200 > 1.2 * 2056 = 2467.2
    let logs = FixedLogs::new(3200, 8000);
    let planner = CannedPlanner::returning(sample_plan("Adjusted plan", 7));

    let controller = AdaptiveController::new(&store, &logs, &planner, test_profile());
    let outcome = controller.run().await;

    assert!(outcome.progress_report.starts_with("Compliance Alert"));
    assert!(outcome.progress_report.contains("3200"));
    assert!(outcome.progress_report.contains("2056"));
    assert!(outcome.new_plan.is_some());
    assert_eq!(store.save_count(), 1);
    assert_eq!(store.active_count("test-user"), 1);
}

#[tokio::test]
async fn test_low_steps_raise_activity_alert() {
    init_test_logging();
    let store = MemoryStore::with_active_plan(sample_plan("Current", 7), "test-user");
    // Calories fine (1900 <= 2467.2), steps below 5000.
    let logs = FixedLogs::new(1900, 3000);
    let planner = CannedPlanner::returning(sample_plan("Movement plan", 7));

    let controller = AdaptiveController::new(&store, &logs, &planner, test_profile());
    let outcome = controller.run().await;

    assert!(outcome.progress_report.starts_with("Activity Alert"));
    assert!(outcome.progress_report.contains("3000"));
    assert!(outcome.new_plan.is_some());
    assert_eq!(planner.call_count(), 1);
}

#[tokio::test]
async fn test_adequate_progress_keeps_current_plan() {
    init_test_logging();
    let store = MemoryStore::with_active_plan(sample_plan("Current", 7), "test-user");
    let logs = FixedLogs::new(1900, 8000);
    let planner = CannedPlanner::returning(sample_plan("unwanted", 7));

    let controller = AdaptiveController::new(&store, &logs, &planner, test_profile());
    let outcome = controller.run().await;

    assert_eq!(
        outcome.progress_report,
        "Progress is adequate. Maintaining current plan."
    );
    assert!(!outcome.replan_needed);
    assert!(outcome.new_plan.is_none());
    assert_eq!(planner.call_count(), 0, "no replan call on adequate progress");
    assert_eq!(store.save_count(), 0, "no store write without a replan");
}

#[tokio::test]
async fn test_evaluation_report_is_appended_to_context() {
    init_test_logging();
    let store = MemoryStore::with_active_plan(sample_plan("Current", 7), "test-user");
    let logs = FixedLogs::new(1900, 8000);
    let planner = CannedPlanner::returning(sample_plan("unused", 7));

    let controller = AdaptiveController::new(&store, &logs, &planner, test_profile());
    let outcome = controller.run().await;

    assert!(outcome.llm_context.contains("USER PROFILE:"));
    assert!(outcome.llm_context.contains("TODAY'S LOGS:"));
    assert!(outcome
        .llm_context
        .contains("EVALUATION: Progress is adequate."));
}

// ============================================================================
// Failure paths
// ============================================================================

#[tokio::test]
async fn test_storage_connection_failure_short_circuits_cycle() {
    init_test_logging();
    let store = MemoryStore {
        fail_load: Some(ErrorCode::StorageError),
        ..MemoryStore::default()
    };
    let logs = FixedLogs::new(1900, 8000);
    let planner = CannedPlanner::returning(sample_plan("unused", 7));

    let controller = AdaptiveController::new(&store, &logs, &planner, test_profile());
    let outcome = controller.run().await;

    assert_eq!(
        outcome.progress_report,
        "FATAL ERROR: Database connection failed."
    );
    assert!(!outcome.replan_needed);
    assert!(outcome.new_plan.is_none());
    assert_eq!(planner.call_count(), 0, "evaluation and replan are skipped");
}

#[tokio::test]
async fn test_log_provider_failure_short_circuits_cycle() {
    init_test_logging();
    let store = MemoryStore::default();
    let logs = FixedLogs::failing();
    let planner = CannedPlanner::returning(sample_plan("unused", 7));

    let controller = AdaptiveController::new(&store, &logs, &planner, test_profile());
    let outcome = controller.run().await;

    assert_eq!(outcome.progress_report, "FATAL ERROR: Data fetching failed.");
    assert_eq!(planner.call_count(), 0);
    assert_eq!(store.save_count(), 0);
}

#[tokio::test]
async fn test_planner_auth_failure_reports_kind_without_persisting() {
    init_test_logging();
    let store = MemoryStore::default();
    let logs = FixedLogs::new(1900, 8000);
    let planner = CannedPlanner::failing(ErrorCode::ExternalAuthFailed);

    let controller = AdaptiveController::new(&store, &logs, &planner, test_profile());
    let outcome = controller.run().await;

    assert_eq!(
        outcome.progress_report,
        "FATAL ERROR: Planning failed due to: authentication."
    );
    assert!(outcome.new_plan.is_none());
    assert_eq!(store.save_count(), 0, "nothing is persisted on failure");
}

#[tokio::test]
async fn test_planner_malformed_output_reports_kind() {
    init_test_logging();
    let store = MemoryStore::default();
    let logs = FixedLogs::new(1900, 8000);
    let planner = CannedPlanner::failing(ErrorCode::SerializationError);

    let controller = AdaptiveController::new(&store, &logs, &planner, test_profile());
    let outcome = controller.run().await;

    assert_eq!(
        outcome.progress_report,
        "FATAL ERROR: Planning failed due to: malformed output."
    );
    assert!(outcome.new_plan.is_none());
}

#[tokio::test]
async fn test_planner_rate_limit_reports_kind() {
    init_test_logging();
    let store = MemoryStore::default();
    let logs = FixedLogs::new(1900, 8000);
    let planner = CannedPlanner::failing(ErrorCode::ExternalRateLimited);

    let controller = AdaptiveController::new(&store, &logs, &planner, test_profile());
    let outcome = controller.run().await;

    assert_eq!(
        outcome.progress_report,
        "FATAL ERROR: Planning failed due to: rate limiting."
    );
}

#[tokio::test]
async fn test_save_failure_after_planning_reports_storage_kind() {
    init_test_logging();
    let store = MemoryStore {
        fail_save: Some(ErrorCode::DatabaseError),
        ..MemoryStore::default()
    };
    let logs = FixedLogs::new(1900, 8000);
    let planner = CannedPlanner::returning(sample_plan("Doomed plan", 7));

    let controller = AdaptiveController::new(&store, &logs, &planner, test_profile());
    let outcome = controller.run().await;

    assert_eq!(
        outcome.progress_report,
        "FATAL ERROR: Planning failed due to: storage."
    );
    assert!(outcome.new_plan.is_none(), "a plan that failed to persist is not surfaced");
}

#[tokio::test]
async fn test_invalid_plan_from_engine_is_never_persisted() {
    init_test_logging();
    let store = MemoryStore::default();
    let logs = FixedLogs::new(1900, 8000);

    let mut broken = sample_plan("Broken", 3);
    broken.daily_plans[1].day = 3; // duplicate day 3, missing day 2
    let planner = CannedPlanner::returning(broken);

    let controller = AdaptiveController::new(&store, &logs, &planner, test_profile());
    let outcome = controller.run().await;

    assert_eq!(
        outcome.progress_report,
        "FATAL ERROR: Planning failed due to: malformed output."
    );
    assert!(outcome.new_plan.is_none());
    assert_eq!(store.active_count("test-user"), 0);
}
