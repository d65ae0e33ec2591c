// ABOUTME: Database factory with automatic backend detection from the connection string
// ABOUTME: Wraps concrete PlanStore implementations behind a single dispatch enum
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database factory for creating plan-store backends
//!
//! Detects the database type from the connection string and constructs
//! the matching backend. The returned [`Database`] value is the handle
//! the composition root owns and injects everywhere a [`PlanStore`] is
//! needed.

use async_trait::async_trait;
use tracing::{debug, info};

use super::sqlite::SqliteDatabase;
use super::PlanStore;
use crate::errors::{AppError, AppResult};
use crate::models::{HealthPlan, StoredPlan};

/// Supported database types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    /// Embedded file or in-memory database
    SQLite,
}

/// Database instance wrapper delegating to the concrete backend
#[derive(Debug, Clone)]
pub enum Database {
    /// SQLite backend
    SQLite(SqliteDatabase),
}

impl Database {
    /// Descriptive string for the current backend
    #[must_use]
    pub const fn backend_info(&self) -> &'static str {
        match self {
            Self::SQLite(_) => "SQLite (embedded)",
        }
    }

    /// Create a new database instance based on the connection string
    ///
    /// # Errors
    ///
    /// Returns an error if the URL scheme is unsupported or the
    /// connection cannot be established.
    pub async fn new(database_url: &str) -> AppResult<Self> {
        debug!("Detecting database type from URL");
        let db_type = detect_database_type(database_url)?;
        info!("Detected database type: {db_type:?}");

        match db_type {
            DatabaseType::SQLite => {
                let db = SqliteDatabase::new(database_url).await?;
                info!("SQLite database initialized successfully");
                Ok(Self::SQLite(db))
            }
        }
    }
}

/// Detect database type from a connection string
///
/// # Errors
///
/// Returns a configuration error for unrecognized URL schemes. A
/// `postgresql://` URL is recognized but rejected: this build ships the
/// embedded backend only.
pub fn detect_database_type(database_url: &str) -> AppResult<DatabaseType> {
    if database_url.starts_with("sqlite:") {
        Ok(DatabaseType::SQLite)
    } else if database_url.starts_with("postgresql://") || database_url.starts_with("postgres://") {
        Err(AppError::config(
            "PostgreSQL connection string detected, but this build only supports SQLite. \
             Use sqlite:path/to/db.sqlite or sqlite::memory:",
        ))
    } else {
        Err(AppError::config(format!(
            "Unsupported database URL format: {database_url}. \
             Supported format: sqlite:path/to/db.sqlite"
        )))
    }
}

#[async_trait]
impl PlanStore for Database {
    async fn migrate(&self) -> AppResult<()> {
        match self {
            Self::SQLite(db) => db.migrate().await,
        }
    }

    async fn save_plan(&self, user_id: &str, plan: &HealthPlan) -> AppResult<String> {
        match self {
            Self::SQLite(db) => db.save_plan(user_id, plan).await,
        }
    }

    async fn load_active_plan(&self, user_id: &str) -> AppResult<Option<StoredPlan>> {
        match self {
            Self::SQLite(db) => db.load_active_plan(user_id).await,
        }
    }

    async fn plan_history(&self, user_id: &str) -> AppResult<Vec<StoredPlan>> {
        match self {
            Self::SQLite(db) => db.plan_history(user_id).await,
        }
    }
}
