//! Repository for the `alerts` table.

use guardia_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::alert::{Alert, CreateAlert};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, reporter_id, alert_type, content, media_ref, latitude, longitude, \
                       tag, status, transcription, transcription_keywords, transcription_status, \
                       responded_by, responded_at, created_at";

pub struct AlertRepo;

impl AlertRepo {
    /// Insert a new pending alert, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateAlert) -> Result<Alert, sqlx::Error> {
        let query = format!(
            "INSERT INTO alerts (reporter_id, alert_type, content, media_ref, latitude, \
                                 longitude, tag, transcription_status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(input.reporter_id)
            .bind(&input.alert_type)
            .bind(&input.content)
            .bind(&input.media_ref)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(&input.tag)
            .bind(&input.transcription_status)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM alerts WHERE id = $1");
        sqlx::query_as::<_, Alert>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Atomically claim a pending alert for an officer.
    ///
    /// The `status = 'pending'` guard is the serialization point for
    /// concurrent claims: exactly one claimer observes a row here, every
    /// other claimer gets `None`. Takes any executor so the claim can run
    /// inside the transaction that also writes the response row.
    pub async fn claim(
        executor: impl sqlx::PgExecutor<'_>,
        alert_id: DbId,
        officer_id: DbId,
        now: Timestamp,
    ) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!(
            "UPDATE alerts
             SET status = 'responded', responded_by = $2, responded_at = $3
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(alert_id)
            .bind(officer_id)
            .bind(now)
            .fetch_optional(executor)
            .await
    }

    /// Advance a responded alert to resolved. Returns `false` if the
    /// alert was not in `responded` state.
    pub async fn mark_resolved(pool: &PgPool, alert_id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE alerts SET status = 'resolved' WHERE id = $1 AND status = 'responded'")
                .bind(alert_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store a completed transcription.
    pub async fn set_transcription(
        pool: &PgPool,
        alert_id: DbId,
        transcription: &str,
        keywords: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE alerts
             SET transcription = $2, transcription_keywords = $3, transcription_status = 'completed'
             WHERE id = $1",
        )
        .bind(alert_id)
        .bind(transcription)
        .bind(keywords)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a transcription attempt as failed.
    pub async fn mark_transcription_failed(
        pool: &PgPool,
        alert_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE alerts SET transcription_status = 'failed' WHERE id = $1")
                .bind(alert_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All pending alerts, newest first.
    pub async fn list_pending(pool: &PgPool) -> Result<Vec<Alert>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM alerts WHERE status = 'pending' ORDER BY created_at DESC");
        sqlx::query_as::<_, Alert>(&query).fetch_all(pool).await
    }

    /// Alerts currently held by an officer (claimed, not yet resolved),
    /// newest first.
    pub async fn list_responded_by(
        pool: &PgPool,
        officer_id: DbId,
    ) -> Result<Vec<Alert>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alerts
             WHERE status = 'responded' AND responded_by = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(officer_id)
            .fetch_all(pool)
            .await
    }

    /// All alerts created by a reporter, newest first.
    pub async fn list_for_reporter(
        pool: &PgPool,
        reporter_id: DbId,
    ) -> Result<Vec<Alert>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alerts WHERE reporter_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(reporter_id)
            .fetch_all(pool)
            .await
    }
}
