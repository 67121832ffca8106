//! Handlers for the per-alert chat thread.
//!
//! A thread exists between the reporter and the officer who claimed the
//! alert. Only those two participants may read or post; a message posted
//! by one is addressed to the other and pushed to both participants'
//! private rooms, so the sender's other devices stay in sync too.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use guardia_core::error::CoreError;
use guardia_core::rooms::user_room;
use guardia_core::types::DbId;
use guardia_db::models::alert::Alert;
use guardia_db::models::chat_message::{ChatMessage, CreateChatMessage};
use guardia_db::repositories::{AlertRepo, ChatRepo};
use guardia_events::{names, RoomEvent};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /chat/{alert_id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
}

/// GET /api/v1/chat/{alert_id}
///
/// List the alert's chat thread, oldest first. Also marks everything
/// addressed to the caller as read.
pub async fn list_messages(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(alert_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ChatMessage>>>> {
    let alert = load_alert(&state, alert_id).await?;
    require_participant(&alert, auth.user_id)?;

    ChatRepo::mark_read(&state.pool, alert_id, auth.user_id).await?;
    let messages = ChatRepo::list_for_alert(&state.pool, alert_id).await?;
    Ok(Json(DataResponse::new(messages)))
}

/// POST /api/v1/chat/{alert_id}
///
/// Post a message into the thread. Requires the alert to have been
/// claimed, since before that there is no counterparty to address.
pub async fn send_message(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(alert_id): Path<DbId>,
    Json(input): Json<SendMessageRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ChatMessage>>)> {
    input.validate()?;

    let alert = load_alert(&state, alert_id).await?;
    require_participant(&alert, auth.user_id)?;

    let Some(officer_id) = alert.responded_by else {
        return Err(AppError::Core(CoreError::InvalidState(
            "Chat opens once an officer responds to the alert".into(),
        )));
    };

    let receiver_id = if auth.user_id == alert.reporter_id {
        officer_id
    } else {
        alert.reporter_id
    };

    let message = ChatRepo::create(
        &state.pool,
        &CreateChatMessage {
            alert_id,
            sender_id: auth.user_id,
            receiver_id,
            message: input.message,
            message_type: "text".to_string(),
        },
    )
    .await?;

    // Both participants' rooms: the receiver sees the new message, the
    // sender's other devices see their own send.
    for user_id in [receiver_id, auth.user_id] {
        state.event_bus.publish(RoomEvent::new(
            user_room(user_id),
            names::CHAT_MESSAGE,
            serde_json::json!({ "message": message }),
        ));
    }

    Ok((StatusCode::CREATED, Json(DataResponse::new(message))))
}

async fn load_alert(state: &AppState, alert_id: DbId) -> AppResult<Alert> {
    AlertRepo::find_by_id(&state.pool, alert_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Alert",
            id: alert_id,
        }))
}

/// Participants are the reporter and the claiming officer.
fn require_participant(alert: &Alert, user_id: DbId) -> AppResult<()> {
    if user_id == alert.reporter_id || alert.responded_by == Some(user_id) {
        return Ok(());
    }
    Err(AppError::Core(CoreError::Forbidden(
        "Not a participant in this alert's chat".into(),
    )))
}
