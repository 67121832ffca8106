//! Repository for the `users` table.

use guardia_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{OfficerBrief, ReporterBrief, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, full_name, role, account_status, badge_number, phone, \
                       created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    /// Fetch a user by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Compact officer card for alert views.
    pub async fn officer_brief(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<OfficerBrief>, sqlx::Error> {
        sqlx::query_as::<_, OfficerBrief>(
            "SELECT id, full_name, badge_number, phone FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Reporter cards for a batch of ids in one round trip. Unknown ids
    /// are simply absent from the result.
    pub async fn reporter_briefs(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<ReporterBrief>, sqlx::Error> {
        sqlx::query_as::<_, ReporterBrief>(
            "SELECT id, full_name, phone FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }
}
