//! Repository for the `safe_walk_sessions` table.
//!
//! Every status transition is a guarded conditional update on
//! `status = 'active'`. The guard is what lets user actions and the
//! background expiry monitor race on the same row safely: whichever
//! transition commits first wins, and the loser's `rows_affected() == 0`
//! tells it to back off.

use guardia_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::safewalk::{CreateSafeWalkSession, SafeWalkSession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, status, start_time, end_time, start_latitude, \
                       start_longitude, current_latitude, current_longitude, created_at";

pub struct SafeWalkRepo;

impl SafeWalkRepo {
    /// Insert a new active session; position starts at the start point.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSafeWalkSession,
    ) -> Result<SafeWalkSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO safe_walk_sessions (user_id, end_time, start_latitude, start_longitude, \
                                             current_latitude, current_longitude)
             VALUES ($1, $2, $3, $4, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SafeWalkSession>(&query)
            .bind(input.user_id)
            .bind(input.end_time)
            .bind(input.start_latitude)
            .bind(input.start_longitude)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SafeWalkSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM safe_walk_sessions WHERE id = $1");
        sqlx::query_as::<_, SafeWalkSession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The user's active session, if one exists. The partial unique index
    /// guarantees at most one row matches.
    pub async fn find_active_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<SafeWalkSession>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM safe_walk_sessions WHERE user_id = $1 AND status = 'active'");
        sqlx::query_as::<_, SafeWalkSession>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Record a check-in position. Position only; the deadline is a
    /// liveness budget, not extended by check-ins. Returns `false` if
    /// the session is no longer active.
    pub async fn update_position(
        pool: &PgPool,
        id: DbId,
        latitude: f64,
        longitude: f64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE safe_walk_sessions
             SET current_latitude = $2, current_longitude = $3
             WHERE id = $1 AND status = 'active'",
        )
        .bind(id)
        .bind(latitude)
        .bind(longitude)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Transition an active session to completed, snapping `end_time` to
    /// the completion time. Returns `false` if the session was not active.
    pub async fn complete(pool: &PgPool, id: DbId, now: Timestamp) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE safe_walk_sessions
             SET status = 'completed', end_time = $2
             WHERE id = $1 AND status = 'active'",
        )
        .bind(id)
        .bind(now)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Transition an active session to emergency_triggered, snapping
    /// `end_time`. Shared by the panic path, the lazy escalation in
    /// `start`, and the background monitor; the `status = 'active'` guard
    /// makes escalation exactly-once. Returns the row as escalated (so
    /// callers see the latest check-in position, not a stale copy), or
    /// `None` if a concurrent transition already won.
    pub async fn escalate(
        pool: &PgPool,
        id: DbId,
        now: Timestamp,
    ) -> Result<Option<SafeWalkSession>, sqlx::Error> {
        let query = format!(
            "UPDATE safe_walk_sessions
             SET status = 'emergency_triggered', end_time = $2
             WHERE id = $1 AND status = 'active'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SafeWalkSession>(&query)
            .bind(id)
            .bind(now)
            .fetch_optional(pool)
            .await
    }

    /// Active sessions whose deadline is strictly in the past.
    pub async fn find_expired_active(
        pool: &PgPool,
        now: Timestamp,
    ) -> Result<Vec<SafeWalkSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM safe_walk_sessions
             WHERE status = 'active' AND end_time < $1
             ORDER BY end_time"
        );
        sqlx::query_as::<_, SafeWalkSession>(&query)
            .bind(now)
            .fetch_all(pool)
            .await
    }
}
