// ABOUTME: Environment-based server configuration with fail-fast validation
// ABOUTME: Resolves the database URL and the user profile at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Environment Configuration
//!
//! - `DATABASE_URL`: storage connection string, **required**
//! - `COACH_PROFILE_PATH`: optional path to a JSON [`UserProfile`];
//!   when unset a built-in demo profile is used
//!
//! The planning engine reads its own `COACH_LLM_*` variables (see
//! [`crate::llm::openai_compatible`]); its credential is required the
//! first time planning runs.

use std::env;
use std::fs;

use tracing::info;

use crate::errors::{AppError, AppResult};
use crate::models::{ActivityLevel, Gender, UserProfile};

/// Environment variable for the storage connection string
const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Environment variable for an optional user-profile JSON file
const PROFILE_PATH_ENV: &str = "COACH_PROFILE_PATH";

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Storage connection string
    pub database_url: String,
    /// Profile of the user the agent coaches
    pub profile: UserProfile,
}

impl ServerConfig {
    /// Resolve configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::ErrorCode::ConfigMissing`] if
    /// `DATABASE_URL` is unset, or a configuration error if the profile
    /// file cannot be read or parsed.
    pub fn from_env() -> AppResult<Self> {
        let database_url = env::var(DATABASE_URL_ENV)
            .ok()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| AppError::config_missing(DATABASE_URL_ENV))?;

        let profile = match env::var(PROFILE_PATH_ENV) {
            Ok(path) if !path.is_empty() => {
                info!("Loading user profile from {path}");
                let raw = fs::read_to_string(&path).map_err(|e| {
                    AppError::config(format!("failed to read profile file {path}: {e}"))
                        .with_source(e)
                })?;
                serde_json::from_str(&raw).map_err(|e| {
                    AppError::config(format!("failed to parse profile file {path}: {e}"))
                        .with_source(e)
                })?
            }
            _ => {
                info!("No profile configured; using the built-in demo profile");
                demo_profile()
            }
        };

        Ok(Self {
            database_url,
            profile,
        })
    }
}

/// Built-in demonstration profile
///
/// Matches the synthetic log provider's default starting weight so demo
/// runs produce coherent numbers.
#[must_use]
pub fn demo_profile() -> UserProfile {
    UserProfile {
        user_id: "demo-user".into(),
        gender: Gender::Male,
        age_years: 30,
        height_cm: 175.0,
        activity_level: ActivityLevel::ModeratelyActive,
        target_weight_kg: 75.0,
        initial_weight_kg: 85.0,
        goal: "Aggressively lose 10 kg over the next 12 weeks while building muscle mass. \
               Must hit protein targets."
            .into(),
    }
}
