use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use guardia_core::error::CoreError;
use guardia_core::roles::{ROLE_ADMIN, ROLE_OFFICER};
use guardia_core::rooms::{user_room, RESPONDERS_ROOM};
use serde::Deserialize;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;
use crate::ws::manager::WsManager;

/// Query parameters accepted by the upgrade endpoint.
#[derive(Debug, Deserialize)]
pub struct WsParams {
    /// JWT access token; browsers cannot set headers on WS upgrades.
    token: String,
}

/// Inbound client frames. Anything that doesn't parse is ignored.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum ClientFrame {
    JoinRoom { room: String },
    LeaveRoom { room: String },
}

/// HTTP handler that authenticates and upgrades the connection.
///
/// The token is validated before the upgrade completes; a bad token gets
/// a plain 401 instead of a WebSocket handshake. On success the
/// connection starts subscribed to the caller's personal room, and
/// officers additionally to the responders room.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let claims = validate_token(&params.token, &state.config.jwt).map_err(|_| {
        AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
    })?;

    Ok(ws.on_upgrade(move |socket| {
        handle_socket(socket, state.ws_manager, claims.sub, claims.role)
    }))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection with `WsManager`, pre-joined to its rooms.
///   2. Spawns a sender task that forwards messages from the manager channel.
///   3. Processes inbound join/leave frames on the current task.
///   4. Cleans up on disconnect.
async fn handle_socket(
    socket: WebSocket,
    ws_manager: Arc<WsManager>,
    user_id: guardia_core::types::DbId,
    role: String,
) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, user_id, role = %role, "WebSocket connected");

    let mut initial_rooms = vec![user_room(user_id)];
    if is_responder(&role) {
        initial_rooms.push(RESPONDERS_ROOM.to_string());
    }

    let mut rx = ws_manager
        .add(conn_id.clone(), user_id, role.clone(), initial_rooms)
        .await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Receiver loop: process inbound frames.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Message::Text(text)) => {
                let Ok(frame) = serde_json::from_str::<ClientFrame>(&text) else {
                    tracing::debug!(conn_id = %conn_id, "Ignoring unparseable frame");
                    continue;
                };
                match frame {
                    ClientFrame::JoinRoom { room } => {
                        if can_join(user_id, &role, &room) {
                            ws_manager.join_room(&conn_id, &room).await;
                            tracing::debug!(conn_id = %conn_id, room = %room, "Joined room");
                        } else {
                            tracing::warn!(
                                conn_id = %conn_id,
                                user_id,
                                room = %room,
                                "Rejected unauthorized room join"
                            );
                        }
                    }
                    ClientFrame::LeaveRoom { room } => {
                        ws_manager.leave_room(&conn_id, &room).await;
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    // Clean up: remove connection and abort sender task.
    ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}

fn is_responder(role: &str) -> bool {
    role == ROLE_OFFICER || role == ROLE_ADMIN
}

/// Room authorization: a user may join their own personal room; the
/// responders room is restricted to officer/admin roles.
fn can_join(user_id: guardia_core::types::DbId, role: &str, room: &str) -> bool {
    if room == RESPONDERS_ROOM {
        return is_responder(role);
    }
    room == user_room(user_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardia_core::roles::ROLE_CITIZEN;

    #[test]
    fn citizen_can_join_own_room_only() {
        assert!(can_join(7, ROLE_CITIZEN, "user_7"));
        assert!(!can_join(7, ROLE_CITIZEN, "user_8"));
        assert!(!can_join(7, ROLE_CITIZEN, RESPONDERS_ROOM));
    }

    #[test]
    fn officer_can_join_responders_room() {
        assert!(can_join(3, ROLE_OFFICER, RESPONDERS_ROOM));
        assert!(can_join(3, ROLE_ADMIN, RESPONDERS_ROOM));
        assert!(!can_join(3, ROLE_OFFICER, "user_9"));
    }
}
