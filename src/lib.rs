// ABOUTME: Main library entry point for the adaptive health coaching agent
// ABOUTME: Exposes the controller, plan store, planning engine, and metrics modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # Coach Agent
//!
//! An adaptive health coaching agent: it evaluates a user's daily health
//! logs against the stored plan, decides whether the plan needs revision,
//! and if so invokes a language model to produce a new structured
//! multi-day nutrition/activity plan, persisting it for later retrieval.
//!
//! ## Architecture
//!
//! - **`intelligence`**: pure energy-metrics calculations (BMR, TDEE,
//!   deficit target)
//! - **`providers`**: daily-log sources behind the `DailyLogProvider`
//!   trait (synthetic by default)
//! - **`database_plugins`**: plan persistence behind the `PlanStore`
//!   trait, SQLite-backed
//! - **`llm`**: the planning engine contract and the `OpenAI`-compatible
//!   implementation
//! - **`agent`**: the adaptive controller driving one
//!   fetch/evaluate/replan cycle
//! - **`formatters`**: text rendering for the CLI read-side
//!
//! ## Example
//!
//! ```rust,no_run
//! use coach_agent::agent::AdaptiveController;
//! use coach_agent::config::environment::demo_profile;
//! use coach_agent::database_plugins::{factory::Database, PlanStore};
//! use coach_agent::errors::AppResult;
//! use coach_agent::llm::OpenAiCompatibleProvider;
//! use coach_agent::providers::SyntheticLogProvider;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let database = Database::new("sqlite::memory:").await?;
//!     database.migrate().await?;
//!
//!     let logs = SyntheticLogProvider::default();
//!     let planner = OpenAiCompatibleProvider::from_env()?;
//!
//!     let controller =
//!         AdaptiveController::new(&database, &logs, &planner, demo_profile());
//!     let outcome = controller.run().await;
//!     println!("{}", outcome.progress_report);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod config;
pub mod database_plugins;
pub mod errors;
pub mod formatters;
pub mod intelligence;
pub mod llm;
pub mod logging;
pub mod models;
pub mod providers;
