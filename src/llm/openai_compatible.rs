// ABOUTME: Generic OpenAI-compatible planning engine for cloud and local endpoints
// ABOUTME: JSON-mode chat completion with strict schema validation and error-kind mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # `OpenAI`-Compatible Planning Engine
//!
//! Works against any endpoint implementing the `OpenAI` chat completions
//! API: the hosted service itself, or local servers such as Ollama and
//! vLLM.
//!
//! ## Configuration
//!
//! - `COACH_LLM_BASE_URL`: API base URL (default: <https://api.openai.com/v1>)
//! - `COACH_LLM_MODEL`: model name (default: `gpt-4o-mini`)
//! - `COACH_LLM_API_KEY`: credential, required; absence is a first-use
//!   fatal configuration error, never a silent no-op
//!
//! ## Failure semantics
//!
//! Every failure maps to a stable error kind: HTTP 401/403 to
//! authentication, 429 to rate limiting, transport errors to network, and
//! any response that does not deserialize and validate as a complete
//! `HealthPlan` to malformed output. The caller never sees a partially
//! parsed plan.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::env;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{prompts, ChatMessage, PlanningEngine, PlanningRequest};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::HealthPlan;

/// Environment variable for the API base URL
const LLM_BASE_URL_ENV: &str = "COACH_LLM_BASE_URL";

/// Environment variable for the model name
const LLM_MODEL_ENV: &str = "COACH_LLM_MODEL";

/// Environment variable for the API credential
const LLM_API_KEY_ENV: &str = "COACH_LLM_API_KEY";

/// Default base URL (hosted `OpenAI` API)
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model for plan generation
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Connection timeout
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Request timeout (plan generation is a long completion)
const REQUEST_TIMEOUT_SECS: u64 = 180;

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

/// Chat completion request body
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    temperature: f32,
    response_format: serde_json::Value,
}

/// Message structure for the wire format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

/// Chat completion response body
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

/// Choice in response
#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

/// Message in response
#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

/// Error response body
#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Configuration for the `OpenAI`-compatible planning engine
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// API base URL
    pub base_url: String,
    /// API credential
    pub api_key: String,
    /// Model used for plan generation
    pub default_model: String,
    /// Provider name for logging
    pub provider_name: &'static str,
    /// Human-readable display name
    pub display_name: &'static str,
}

impl OpenAiCompatibleConfig {
    /// Build configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::ConfigMissing`] if `COACH_LLM_API_KEY` is not
    /// set.
    pub fn from_env() -> AppResult<Self> {
        let api_key = env::var(LLM_API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AppError::config_missing(LLM_API_KEY_ENV))?;

        let base_url = env::var(LLM_BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        let default_model = env::var(LLM_MODEL_ENV).unwrap_or_else(|_| DEFAULT_MODEL.to_owned());

        // Friendlier names for well-known local endpoints
        let (provider_name, display_name) = if base_url.contains(":11434") {
            ("ollama", "Ollama (Local)")
        } else if base_url.contains(":8000") {
            ("vllm", "vLLM (Local)")
        } else if base_url.contains("api.openai.com") {
            ("openai", "OpenAI")
        } else {
            ("openai-compatible", "OpenAI-compatible LLM")
        };

        Ok(Self {
            base_url,
            api_key,
            default_model,
            provider_name,
            display_name,
        })
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Generic `OpenAI`-compatible planning engine
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create a provider from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if the credential is missing or the HTTP client
    /// cannot be created.
    pub fn from_env() -> AppResult<Self> {
        let config = OpenAiCompatibleConfig::from_env()?;
        info!(
            "Initializing {} planning engine: base_url={}, model={}",
            config.display_name, config.base_url, config.default_model
        );
        Self::new(config)
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    /// Map an API error response to a stable error kind
    fn parse_error_response(status: u16, body: &str) -> AppError {
        let message = serde_json::from_str::<OpenAiErrorResponse>(body)
            .map(|r| r.error.message)
            .unwrap_or_else(|_| body.chars().take(200).collect());

        match status {
            401 | 403 => AppError::auth_failed(format!("API authentication failed: {message}")),
            429 => AppError::new(
                ErrorCode::ExternalRateLimited,
                "LLM rate limit reached. Please wait a moment and try again.",
            ),
            500..=599 => AppError::new(
                ErrorCode::ExternalServiceUnavailable,
                format!("LLM service unavailable ({status}): {message}"),
            ),
            _ => AppError::external_service("LLM", format!("API error ({status}): {message}")),
        }
    }

    /// Extract the JSON payload from completion content
    ///
    /// Models occasionally wrap JSON-mode output in markdown code fences;
    /// tolerate that without loosening the schema check itself.
    fn extract_json_payload(content: &str) -> &str {
        let trimmed = content.trim();
        trimmed
            .strip_prefix("```json")
            .or_else(|| trimmed.strip_prefix("```"))
            .and_then(|rest| rest.strip_suffix("```"))
            .map_or(trimmed, str::trim)
    }

    /// Deserialize and validate completion content into a plan
    ///
    /// All-or-nothing: any deviation from the plan schema, including a
    /// violated day-index invariant, rejects the whole response.
    fn parse_plan_content(content: &str) -> AppResult<HealthPlan> {
        let payload = Self::extract_json_payload(content);
        let plan: HealthPlan = serde_json::from_str(payload).map_err(|e| {
            AppError::new(
                ErrorCode::SerializationError,
                format!("planning engine returned non-conforming output: {e}"),
            )
        })?;
        plan.validate()?;
        Ok(plan)
    }
}

#[async_trait]
impl PlanningEngine for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        self.config.provider_name
    }

    fn display_name(&self) -> &'static str {
        self.config.display_name
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    async fn generate_plan(&self, request: &PlanningRequest) -> AppResult<HealthPlan> {
        let messages = prompts::planning_messages(request);
        let body = OpenAiRequest {
            model: self.config.default_model.clone(),
            messages: messages.iter().map(OpenAiMessage::from).collect(),
            temperature: 0.0,
            response_format: json!({"type": "json_object"}),
        };

        debug!(
            "Requesting plan from {} for user {} ({} messages)",
            self.config.provider_name,
            request.profile.user_id,
            messages.len()
        );

        let response = self
            .client
            .post(self.api_url("chat/completions"))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::new(
                    ErrorCode::ExternalServiceUnavailable,
                    format!("failed to reach planning engine: {e}"),
                )
                .with_source(e)
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            AppError::new(
                ErrorCode::ExternalServiceUnavailable,
                format!("failed to read planning engine response: {e}"),
            )
            .with_source(e)
        })?;

        if !status.is_success() {
            warn!(
                "Planning engine returned HTTP {status} for user {}",
                request.profile.user_id
            );
            return Err(Self::parse_error_response(status.as_u16(), &text));
        }

        let parsed: OpenAiResponse = serde_json::from_str(&text).map_err(|e| {
            AppError::new(
                ErrorCode::SerializationError,
                format!("unexpected completion response shape: {e}"),
            )
        })?;

        let content = parsed
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .ok_or_else(|| {
                AppError::new(
                    ErrorCode::SerializationError,
                    "completion response contained no content",
                )
            })?;

        let plan = Self::parse_plan_content(content)?;
        info!(
            "Plan \"{}\" ({} days) generated for user {}",
            plan.plan_title, plan.duration_days, request.profile.user_id
        );
        Ok(plan)
    }

    async fn health_check(&self) -> AppResult<bool> {
        let response = self
            .client
            .get(self.api_url("models"))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .send()
            .await
            .map_err(|e| {
                AppError::new(
                    ErrorCode::ExternalServiceUnavailable,
                    format!("planning engine health check failed: {e}"),
                )
                .with_source(e)
            })?;

        Ok(response.status().is_success())
    }
}
