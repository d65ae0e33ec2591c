// ABOUTME: Planning engine abstraction for pluggable LLM integration
// ABOUTME: Defines chat message types, the PlanningRequest, and the PlanningEngine trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Planning Engine Service Provider Interface
//!
//! The planning engine is an external collaborator: given a profile, a
//! goal, the current date, and accumulated cycle context, it returns a
//! [`HealthPlan`](crate::models::HealthPlan) conforming exactly to the
//! plan schema, or a failure carrying a stable error kind. Schema
//! conformance is all-or-nothing; a partially valid response is a
//! failure.
//!
//! Persistence is **not** the engine's job. The adaptive controller
//! persists a returned plan in a separate, explicit step, so engines stay
//! pure functions over their inputs and tests can substitute trait
//! doubles freely.

pub mod openai_compatible;
pub mod prompts;

pub use openai_compatible::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppResult;
use crate::models::{HealthPlan, UserProfile};

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction message
    System,
    /// User input message
    User,
}

impl MessageRole {
    /// String representation for API calls
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
        }
    }
}

/// A single message in a chat conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Everything the planning engine needs to produce a plan
#[derive(Debug, Clone)]
pub struct PlanningRequest {
    /// The user the plan is for
    pub profile: UserProfile,
    /// Current date, anchoring the plan start
    pub current_date: NaiveDate,
    /// Accumulated cycle context (profile text, current plan, logs,
    /// evaluation report) for adaptation
    pub context: String,
}

impl PlanningRequest {
    /// Create a request with empty context
    #[must_use]
    pub const fn new(profile: UserProfile, current_date: NaiveDate) -> Self {
        Self {
            profile,
            current_date,
            context: String::new(),
        }
    }

    /// Attach accumulated context text
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }
}

/// Planning engine trait
///
/// Implement this to add a new planning backend. The shipped
/// implementation is [`OpenAiCompatibleProvider`]; tests implement the
/// trait directly with canned responses.
#[async_trait]
pub trait PlanningEngine: Send + Sync {
    /// Unique provider identifier (e.g. "openai", "ollama")
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Model used when the request does not specify one
    fn default_model(&self) -> &str;

    /// Generate a plan strictly conforming to the plan schema
    ///
    /// # Errors
    ///
    /// Returns an error carrying one of the planning failure kinds:
    /// authentication, rate limiting, malformed output, network, or
    /// other. Callers must not persist anything on any failure path.
    async fn generate_plan(&self, request: &PlanningRequest) -> AppResult<HealthPlan>;

    /// Check the provider is reachable and the credential is accepted
    ///
    /// # Errors
    ///
    /// Returns an error if the health probe itself cannot run.
    async fn health_check(&self) -> AppResult<bool>;
}
