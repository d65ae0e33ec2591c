// ABOUTME: SQLite implementation of the PlanStore trait over sqlx
// ABOUTME: Transactional deactivate-then-insert save preserving the single-active-plan invariant
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # SQLite Plan Store
//!
//! Embedded, zero-configuration backend for local development, testing,
//! and single-node deployments. Plans live in one `plans` table; the
//! structured daily schedule is stored as a JSON column and rehydrated
//! through serde on load.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use super::PlanStore;
use crate::errors::{AppError, AppResult};
use crate::models::{HealthPlan, StoredPlan};

/// SQLite-backed plan store
#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Connect to the database at `database_url`
    ///
    /// # Errors
    ///
    /// Returns a storage-level error if the connection cannot be
    /// established; subsequent attempts may retry with a fresh handle.
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let is_memory = database_url.contains(":memory:");

        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if is_memory || database_url.contains('?') {
            database_url.to_owned()
        } else {
            format!("{database_url}?mode=rwc")
        };

        // An in-memory database must stay on a single pooled connection:
        // every additional connection opens its own empty database.
        let pool = SqlitePoolOptions::new()
            .max_connections(if is_memory { 1 } else { 5 })
            .connect(&connection_options)
            .await
            .map_err(|e| {
                AppError::storage(format!("failed to connect to {database_url}: {e}"))
                    .with_source(e)
            })?;

        debug!("Connected to SQLite database at {database_url}");
        Ok(Self { pool })
    }

    /// Access the underlying pool (integration tests use this for raw
    /// invariant queries)
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn row_to_stored_plan(row: &sqlx::sqlite::SqliteRow) -> AppResult<StoredPlan> {
        let daily_plans_json: String = row.try_get("daily_plans").map_err(AppError::from)?;
        let daily_plans = serde_json::from_str(&daily_plans_json)?;

        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(AppError::from)?;
        let duration_days: i64 = row.try_get("duration_days").map_err(AppError::from)?;

        Ok(StoredPlan {
            id: row.try_get("id").map_err(AppError::from)?,
            user_id: row.try_get("user_id").map_err(AppError::from)?,
            created_at,
            is_active: row.try_get("is_active").map_err(AppError::from)?,
            plan: HealthPlan {
                plan_title: row.try_get("plan_title").map_err(AppError::from)?,
                duration_days: duration_days as u32,
                agent_reasoning: row.try_get("agent_reasoning").map_err(AppError::from)?,
                daily_plans,
            },
        })
    }
}

#[async_trait]
impl PlanStore for SqliteDatabase {
    async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS plans (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                plan_title TEXT NOT NULL,
                duration_days INTEGER NOT NULL,
                agent_reasoning TEXT NOT NULL,
                daily_plans TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_plans_user_active ON plans (user_id, is_active)",
        )
        .execute(&self.pool)
        .await?;

        info!("SQLite plan store schema ready");
        Ok(())
    }

    async fn save_plan(&self, user_id: &str, plan: &HealthPlan) -> AppResult<String> {
        plan.validate()?;

        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        let daily_plans_json = serde_json::to_string(&plan.daily_plans)?;

        // Deactivation and insertion commit together, so there is never a
        // window where a user has two active plans.
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE plans SET is_active = 0 WHERE user_id = ? AND is_active = 1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r"
            INSERT INTO plans
                (id, user_id, created_at, is_active, plan_title, duration_days,
                 agent_reasoning, daily_plans)
            VALUES (?, ?, ?, 1, ?, ?, ?, ?)
            ",
        )
        .bind(&id)
        .bind(user_id)
        .bind(created_at)
        .bind(&plan.plan_title)
        .bind(i64::from(plan.duration_days))
        .bind(&plan.agent_reasoning)
        .bind(&daily_plans_json)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("New plan saved for user {user_id} with ID: {id}");
        Ok(id)
    }

    async fn load_active_plan(&self, user_id: &str) -> AppResult<Option<StoredPlan>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, created_at, is_active, plan_title, duration_days,
                   agent_reasoning, daily_plans
            FROM plans
            WHERE user_id = ? AND is_active = 1
            ORDER BY created_at DESC
            LIMIT 1
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            debug!("No active plan found for user {user_id}");
            return Ok(None);
        };

        debug!("Active plan loaded for user {user_id}");
        Ok(Some(Self::row_to_stored_plan(&row)?))
    }

    async fn plan_history(&self, user_id: &str) -> AppResult<Vec<StoredPlan>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, created_at, is_active, plan_title, duration_days,
                   agent_reasoning, daily_plans
            FROM plans
            WHERE user_id = ?
            ORDER BY created_at DESC, rowid DESC
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_stored_plan).collect()
    }
}
