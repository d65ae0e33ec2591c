// ABOUTME: Cycle state machine types for the adaptive controller
// ABOUTME: AgentState record, cycle phases, events, and the explicit transition function
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Cycle State Machine
//!
//! One evaluation cycle walks `Fetch -> Evaluate -> (Replan | Done)`,
//! with `Replan` always ending in `Done`. The transition function is
//! explicit: every legal `(phase, event)` pair is enumerated and anything
//! else is rejected, so control flow bugs surface as errors instead of
//! silently skipping steps.

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::models::{DailyLog, HealthPlan, StoredPlan};

/// Phase of the evaluation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CyclePhase {
    /// Loading the active plan and today's logs
    Fetch,
    /// Judging compliance against the plan
    Evaluate,
    /// Generating and persisting a replacement plan
    Replan,
    /// Terminal state; the cycle result is in the agent state
    Done,
}

/// Event emitted by a phase handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleEvent {
    /// Plan and logs loaded successfully
    FetchSucceeded,
    /// Fetch failed; the cycle is over
    FetchFailed,
    /// Evaluation decided a new plan is required
    ReplanRequired,
    /// Evaluation decided the current plan stands
    PlanOnTrack,
    /// Replanning finished (successfully or not)
    ReplanFinished,
}

/// Advance the cycle state machine by one event
///
/// # Errors
///
/// Returns an internal error for any `(phase, event)` pair outside the
/// cycle graph.
pub fn transition(current: CyclePhase, event: CycleEvent) -> AppResult<CyclePhase> {
    match (current, event) {
        (CyclePhase::Fetch, CycleEvent::FetchSucceeded) => Ok(CyclePhase::Evaluate),
        (CyclePhase::Fetch, CycleEvent::FetchFailed)
        | (CyclePhase::Evaluate, CycleEvent::PlanOnTrack)
        | (CyclePhase::Replan, CycleEvent::ReplanFinished) => Ok(CyclePhase::Done),
        (CyclePhase::Evaluate, CycleEvent::ReplanRequired) => Ok(CyclePhase::Replan),
        (phase, event) => Err(AppError::internal(format!(
            "invalid cycle transition: {phase:?} on {event:?}"
        ))),
    }
}

/// Transient state threaded through one evaluation cycle
///
/// Created at cycle start and discarded at cycle end; never persisted.
/// All fields are always present; absence is an explicit `None`, not a
/// missing key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentState {
    /// User the cycle runs for
    pub user_id: String,
    /// Active plan loaded during fetch, if any
    pub current_plan: Option<StoredPlan>,
    /// Today's logs loaded during fetch, if any
    pub logs: Option<DailyLog>,
    /// Whether evaluation decided a new plan is required
    pub replan_needed: bool,
    /// Human-readable outcome of the cycle
    pub progress_report: String,
    /// Freshly generated plan, present only after a successful replan
    pub new_plan: Option<HealthPlan>,
    /// Accumulated context text handed to the planning engine
    pub llm_context: String,
}

impl AgentState {
    /// Fresh state for a new cycle
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            current_plan: None,
            logs: None,
            replan_needed: false,
            progress_report: String::new(),
            new_plan: None,
            llm_context: String::new(),
        }
    }
}
