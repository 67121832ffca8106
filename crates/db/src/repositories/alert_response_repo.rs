//! Repository for the `alert_responses` table.

use guardia_core::types::DbId;
use sqlx::PgPool;

use crate::models::alert_response::{AlertResponse, CreateAlertResponse};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, alert_id, officer_id, status, officer_latitude, officer_longitude, \
                       distance_km, notes, response_time";

pub struct AlertResponseRepo;

impl AlertResponseRepo {
    /// Insert the response created by a successful claim. Runs on any
    /// executor so it can share the claim's transaction.
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        input: &CreateAlertResponse,
    ) -> Result<AlertResponse, sqlx::Error> {
        let query = format!(
            "INSERT INTO alert_responses (alert_id, officer_id, officer_latitude, \
                                          officer_longitude, distance_km, notes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AlertResponse>(&query)
            .bind(input.alert_id)
            .bind(input.officer_id)
            .bind(input.officer_latitude)
            .bind(input.officer_longitude)
            .bind(input.distance_km)
            .bind(&input.notes)
            .fetch_one(executor)
            .await
    }

    /// The alert's active (non-cancelled) response, if any. The partial
    /// unique index guarantees at most one row matches.
    pub async fn find_active_for_alert(
        pool: &PgPool,
        alert_id: DbId,
    ) -> Result<Option<AlertResponse>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alert_responses
             WHERE alert_id = $1 AND status <> 'cancelled'"
        );
        sqlx::query_as::<_, AlertResponse>(&query)
            .bind(alert_id)
            .fetch_optional(pool)
            .await
    }

    /// Update a response's sub-status, optionally replacing the notes.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
        notes: Option<&str>,
    ) -> Result<Option<AlertResponse>, sqlx::Error> {
        let query = format!(
            "UPDATE alert_responses
             SET status = $2, notes = COALESCE($3, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AlertResponse>(&query)
            .bind(id)
            .bind(status)
            .bind(notes)
            .fetch_optional(pool)
            .await
    }

    /// An officer's response history, newest first.
    pub async fn list_for_officer(
        pool: &PgPool,
        officer_id: DbId,
    ) -> Result<Vec<AlertResponse>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alert_responses
             WHERE officer_id = $1 ORDER BY response_time DESC"
        );
        sqlx::query_as::<_, AlertResponse>(&query)
            .bind(officer_id)
            .fetch_all(pool)
            .await
    }
}
