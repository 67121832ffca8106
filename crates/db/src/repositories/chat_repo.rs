//! Repository for the `chat_messages` table.

use guardia_core::types::DbId;
use sqlx::PgPool;

use crate::models::chat_message::{ChatMessage, CreateChatMessage};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, alert_id, sender_id, receiver_id, message, message_type, created_at, read_at";

pub struct ChatRepo;

impl ChatRepo {
    /// Insert a new chat message, returning the created row. Runs on any
    /// executor; the claim path inserts its announcement transactionally.
    pub async fn create(
        executor: impl sqlx::PgExecutor<'_>,
        input: &CreateChatMessage,
    ) -> Result<ChatMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO chat_messages (alert_id, sender_id, receiver_id, message, message_type)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(input.alert_id)
            .bind(input.sender_id)
            .bind(input.receiver_id)
            .bind(&input.message)
            .bind(&input.message_type)
            .fetch_one(executor)
            .await
    }

    /// All messages for an alert, oldest first.
    pub async fn list_for_alert(
        pool: &PgPool,
        alert_id: DbId,
    ) -> Result<Vec<ChatMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM chat_messages WHERE alert_id = $1 ORDER BY created_at"
        );
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(alert_id)
            .fetch_all(pool)
            .await
    }

    /// Whether any chat exists for the alert.
    pub async fn exists_for_alert(pool: &PgPool, alert_id: DbId) -> Result<bool, sqlx::Error> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM chat_messages WHERE alert_id = $1")
                .bind(alert_id)
                .fetch_one(pool)
                .await?;
        Ok(count > 0)
    }

    /// Mark everything addressed to `receiver_id` on this alert as read.
    /// Returns the number of messages marked.
    pub async fn mark_read(
        pool: &PgPool,
        alert_id: DbId,
        receiver_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE chat_messages SET read_at = NOW()
             WHERE alert_id = $1 AND receiver_id = $2 AND read_at IS NULL",
        )
        .bind(alert_id)
        .bind(receiver_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
