// ABOUTME: Fixed planning instructions and prompt assembly for the planning engine
// ABOUTME: Builds the system/user message pair from a PlanningRequest
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Planning Prompts
//!
//! The fixed instruction text sent to the planning engine, plus the
//! assembly of a [`PlanningRequest`] into concrete chat messages. Cycle
//! context is appended to the system message so the engine adapts the
//! plan to the latest evaluation without the instructions themselves
//! changing between runs.

use super::{ChatMessage, PlanningRequest};

/// Fixed system instructions for plan generation
///
/// The response-shape section mirrors the `HealthPlan` serde model; the
/// engine's output is deserialized against it all-or-nothing.
pub const PLANNING_SYSTEM_PROMPT: &str = "\
You are an adaptive health and nutrition coach. You design realistic, \
structured multi-day nutrition and activity plans tailored to the user's \
profile, goal, and recent daily logs.

Respond with a single JSON object and nothing else, using exactly this shape:
{
  \"plan_title\": string,          // short, motivational title
  \"duration_days\": integer,      // length of the plan in days
  \"agent_reasoning\": string,     // 2-3 sentences on why this plan
  \"daily_plans\": [               // one entry per day, day = 1..duration_days
    {
      \"day\": integer,
      \"meals\": [
        {
          \"meal_type\": string,           // Breakfast, Lunch, Dinner, or Snack
          \"recipe_suggestion\": string,   // brief, specific meal idea
          \"estimated_kcal\": integer
        }
      ],
      \"activity\": {
        \"activity_type\": string,         // e.g. Cardio, Strength Training, Yoga
        \"duration_minutes\": integer,
        \"description\": string
      }
    }
  ]
}

Every day from 1 to duration_days must appear exactly once. Keep daily \
calorie totals consistent with the user's target and keep activities \
achievable for the stated activity level.";

/// Assemble the chat messages for a planning request
///
/// The system message carries the fixed instructions plus any accumulated
/// cycle context; the user message names the goal and the current date.
#[must_use]
pub fn planning_messages(request: &PlanningRequest) -> Vec<ChatMessage> {
    let system = if request.context.is_empty() {
        PLANNING_SYSTEM_PROMPT.to_owned()
    } else {
        format!(
            "{PLANNING_SYSTEM_PROMPT}\n\nCONTEXT AND HISTORY FOR ADAPTATION:\n{}",
            request.context
        )
    };

    let user = format!(
        "Analyze the provided user profile, history, and metrics. Generate a \
         comprehensive 7-day health and nutrition plan for the goal: {}. The \
         current date is {}.",
        request.profile.goal, request.current_date
    );

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}
