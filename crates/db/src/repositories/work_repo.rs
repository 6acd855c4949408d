//! Repository for the `work` table.
//!
//! A session is inserted running (`stopped_at` NULL) and stopped exactly
//! once. Stopping is not idempotent: a second stop matches no running row
//! and fails with `NotFound`, leaving the first stop time in place.

use sqlx::PgPool;
use timetrack_core::error::CoreError;
use timetrack_core::types::DbId;

use crate::models::work::{StartWork, Work};
use crate::DbResult;

/// Column list for `work` queries.
const COLUMNS: &str = "id, user_id, started_at, stopped_at";

const ENTITY: &str = "Work";

/// Entity name reported when a stop targets no running session.
const RUNNING_ENTITY: &str = "Running work session";

/// Provides start/stop and lookup operations for work sessions.
pub struct WorkRepo;

impl WorkRepo {
    /// Start a new session for a user, returning its id.
    ///
    /// An unknown `user_id` surfaces as a foreign key store error.
    pub async fn start(pool: &PgPool, input: &StartWork) -> DbResult<DbId> {
        let mut tx = pool.begin().await?;
        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO work (user_id, started_at) VALUES ($1, NOW()) RETURNING id",
        )
        .bind(input.user_id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        tracing::debug!(work_id = id, user_id = input.user_id, "Work started");
        Ok(id)
    }

    /// Stop a running session.
    ///
    /// Fails with `NotFound` when no session with `id` exists or it has
    /// already been stopped.
    pub async fn stop(pool: &PgPool, id: DbId) -> DbResult<()> {
        let mut tx = pool.begin().await?;
        let result = sqlx::query(
            "UPDATE work SET stopped_at = NOW() WHERE id = $1 AND stopped_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(CoreError::not_found_by_id(RUNNING_ENTITY, id).into());
        }
        tx.commit().await?;

        tracing::debug!(work_id = id, "Work stopped");
        Ok(())
    }

    /// Find a session by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> DbResult<Work> {
        let query = format!("SELECT {COLUMNS} FROM work WHERE id = $1");
        sqlx::query_as::<_, Work>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| CoreError::not_found_by_id(ENTITY, id).into())
    }

    /// List a user's sessions, oldest first. Empty when there are none.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> DbResult<Vec<Work>> {
        let query = format!(
            "SELECT {COLUMNS} FROM work WHERE user_id = $1 ORDER BY started_at ASC, id ASC"
        );
        let works = sqlx::query_as::<_, Work>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;
        Ok(works)
    }
}
