// ABOUTME: Adaptive controller orchestrating fetch, evaluation, and replanning
// ABOUTME: Drives one cycle through the explicit state machine with injected collaborators
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Adaptive Controller
//!
//! The orchestration core: pull state from the plan store and the log
//! provider, evaluate compliance, and only when evaluation demands it,
//! ask the planning engine for a replacement plan and persist it.
//!
//! All collaborators are injected traits, owned by the composition root.
//! A run never returns an error: failures fold into the final
//! [`AgentState`] as a human-readable progress report, because the cycle
//! outcome (including "it failed") is the product, not an exception.
//!
//! Failure policy per phase:
//! - **Fetch** failures are cycle-terminal: no evaluation happens on
//!   missing data and nothing is retried within the run.
//! - **Evaluate** failures bias toward replanning rather than silently
//!   continuing on a stale plan.
//! - **Replan** failures terminate the cycle without persisting anything;
//!   exactly one store write happens per successful replan, zero
//!   otherwise.

pub mod state;

pub use state::{transition, AgentState, CycleEvent, CyclePhase};

use chrono::Utc;
use tracing::{error, info, warn};

use crate::database_plugins::PlanStore;
use crate::errors::ErrorCode;
use crate::intelligence::calculate_metrics;
use crate::llm::{PlanningEngine, PlanningRequest};
use crate::models::{DailyLog, UserProfile};
use crate::providers::DailyLogProvider;

/// Step threshold below which evaluation demands a replan
const MIN_DAILY_STEPS: u32 = 5000;

/// Calorie overshoot ratio that triggers a compliance alert
const CALORIE_OVERSHOOT_RATIO: f64 = 1.2;

/// The adaptive planning controller
///
/// Holds references to its collaborators for the duration of a run;
/// concurrent runs for different users are independent and share no
/// mutable state.
pub struct AdaptiveController<'a, S, L, P>
where
    S: PlanStore,
    L: DailyLogProvider,
    P: PlanningEngine,
{
    store: &'a S,
    log_provider: &'a L,
    planner: &'a P,
    profile: UserProfile,
}

impl<'a, S, L, P> AdaptiveController<'a, S, L, P>
where
    S: PlanStore,
    L: DailyLogProvider,
    P: PlanningEngine,
{
    /// Create a controller for one user profile
    pub const fn new(store: &'a S, log_provider: &'a L, planner: &'a P, profile: UserProfile) -> Self {
        Self {
            store,
            log_provider,
            planner,
            profile,
        }
    }

    /// Run one full evaluation cycle and return the final state
    pub async fn run(&self) -> AgentState {
        let mut agent_state = AgentState::new(self.profile.user_id.clone());
        let mut phase = CyclePhase::Fetch;

        info!("Starting evaluation cycle for user {}", self.profile.user_id);

        loop {
            let event = match phase {
                CyclePhase::Fetch => self.fetch(&mut agent_state).await,
                CyclePhase::Evaluate => self.evaluate(&mut agent_state),
                CyclePhase::Replan => self.replan(&mut agent_state).await,
                CyclePhase::Done => break,
            };

            // Handlers only emit events legal for their phase; an invalid
            // transition still ends the cycle loudly rather than looping.
            phase = transition(phase, event).unwrap_or_else(|e| {
                error!("Cycle aborted: {e}");
                agent_state.progress_report = format!(
                    "FATAL ERROR: Cycle aborted due to: {}.",
                    e.code.failure_class()
                );
                CyclePhase::Done
            });
        }

        info!(
            "Cycle finished for user {}: {}",
            self.profile.user_id, agent_state.progress_report
        );
        agent_state
    }

    /// Fetch the active plan and today's logs
    async fn fetch(&self, agent_state: &mut AgentState) -> CycleEvent {
        let user_id = &self.profile.user_id;

        let active_plan = match self.store.load_active_plan(user_id).await {
            Ok(plan) => plan,
            Err(e) => {
                error!("Failed to load active plan for {user_id}: {e}");
                agent_state.replan_needed = false;
                agent_state.progress_report = if e.code == ErrorCode::StorageError {
                    "FATAL ERROR: Database connection failed.".to_owned()
                } else {
                    "FATAL ERROR: Data fetching failed.".to_owned()
                };
                return CycleEvent::FetchFailed;
            }
        };

        let today = Utc::now().date_naive();
        let logs = match self.log_provider.get_daily_logs(user_id, today).await {
            Ok(logs) => logs,
            Err(e) => {
                error!("Failed to fetch daily logs for {user_id}: {e}");
                agent_state.replan_needed = false;
                agent_state.progress_report = "FATAL ERROR: Data fetching failed.".to_owned();
                return CycleEvent::FetchFailed;
            }
        };

        agent_state.llm_context = format!(
            "USER PROFILE: {}\nCURRENT ACTIVE PLAN: {}\nTODAY'S LOGS: {}",
            json_or_empty(&self.profile),
            active_plan
                .as_ref()
                .map_or_else(|| "None".to_owned(), json_or_empty),
            json_or_empty(&logs),
        );
        agent_state.current_plan = active_plan;
        agent_state.logs = Some(logs);

        info!("Data fetched successfully for user {user_id}");
        CycleEvent::FetchSucceeded
    }

    /// Evaluate compliance and decide whether to replan
    fn evaluate(&self, agent_state: &mut AgentState) -> CycleEvent {
        let (replan, report) = match (&agent_state.current_plan, &agent_state.logs) {
            (None, _) => (
                true,
                "No active plan found. Initial plan required.".to_owned(),
            ),
            (Some(_), Some(logs)) => self.judge_compliance(logs),
            (Some(_), None) => {
                warn!("Evaluation reached without logs. Forcing replan.");
                (
                    true,
                    "FATAL: Metric calculation failed. Forcing replan to establish new base."
                        .to_owned(),
                )
            }
        };

        agent_state.replan_needed = replan;
        agent_state.progress_report.clone_from(&report);
        agent_state.llm_context.push_str("\nEVALUATION: ");
        agent_state.llm_context.push_str(&report);

        if replan {
            CycleEvent::ReplanRequired
        } else {
            CycleEvent::PlanOnTrack
        }
    }

    /// Judge today's log against the computed calorie and step targets
    fn judge_compliance(&self, logs: &DailyLog) -> (bool, String) {
        let metrics = match calculate_metrics(
            logs.weight_kg,
            self.profile.height_cm,
            self.profile.age_years,
            self.profile.gender,
            self.profile.activity_level,
        ) {
            Ok(metrics) => metrics,
            Err(e) => {
                // Better to replan than to keep acting on bad data.
                warn!("Metric calculation failed during evaluation: {e}. Forcing replan.");
                return (
                    true,
                    "FATAL: Metric calculation failed. Forcing replan to establish new base."
                        .to_owned(),
                );
            }
        };

        let target = metrics.target_weight_loss_kcal;
        if f64::from(logs.calories_consumed) > target * CALORIE_OVERSHOOT_RATIO {
            (
                true,
                format!(
                    "Compliance Alert: Calories consumed ({}) were 20%+ over the \
                     target ({target:.0}). Plan adjustment is needed.",
                    logs.calories_consumed
                ),
            )
        } else if logs.steps < MIN_DAILY_STEPS {
            (
                true,
                format!(
                    "Activity Alert: Steps ({}) were too low. Focus needs to shift \
                     to simple movement goals.",
                    logs.steps
                ),
            )
        } else {
            (
                false,
                "Progress is adequate. Maintaining current plan.".to_owned(),
            )
        }
    }

    /// Generate a replacement plan and persist it
    async fn replan(&self, agent_state: &mut AgentState) -> CycleEvent {
        let user_id = &self.profile.user_id;
        info!(
            "Replanning for user {user_id}. Reason: {}",
            agent_state.progress_report
        );

        let request = PlanningRequest::new(self.profile.clone(), Utc::now().date_naive())
            .with_context(agent_state.llm_context.clone());

        match self.planner.generate_plan(&request).await {
            Ok(plan) => match self.store.save_plan(user_id, &plan).await {
                Ok(id) => {
                    info!("New plan persisted for user {user_id} with ID: {id}");
                    agent_state.new_plan = Some(plan);
                    agent_state.replan_needed = false;
                }
                Err(e) => {
                    error!("Failed to persist generated plan for {user_id}: {e}");
                    agent_state.new_plan = None;
                    agent_state.replan_needed = false;
                    agent_state.progress_report = format!(
                        "FATAL ERROR: Planning failed due to: {}.",
                        e.code.failure_class()
                    );
                }
            },
            Err(e) => {
                error!("Planning engine failed for {user_id}: {e}");
                agent_state.new_plan = None;
                agent_state.replan_needed = false;
                agent_state.progress_report = format!(
                    "FATAL ERROR: Planning failed due to: {}.",
                    e.code.failure_class()
                );
            }
        }

        CycleEvent::ReplanFinished
    }
}

/// Serialize a value for context text, degrading to `{}` on failure
fn json_or_empty<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_owned())
}
