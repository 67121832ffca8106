//! Chat message model and DTOs.

use guardia_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A chat message exchanged over an alert.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ChatMessage {
    pub id: DbId,
    pub alert_id: DbId,
    pub sender_id: DbId,
    pub receiver_id: DbId,
    pub message: String,
    pub message_type: String,
    pub created_at: Timestamp,
    pub read_at: Option<Timestamp>,
}

/// DTO for inserting a new chat message.
pub struct CreateChatMessage {
    pub alert_id: DbId,
    pub sender_id: DbId,
    pub receiver_id: DbId,
    pub message: String,
    pub message_type: String,
}
