pub mod alerts;
pub mod chat;
pub mod health;
pub mod safewalk;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                               WebSocket (token query param)
///
/// /alerts                           create, list own (POST, GET)
/// /alerts/nearby                    ranked feed for officers (GET)
/// /alerts/{id}/respond              claim (POST, officer)
/// /alerts/{id}/status               response status (PUT, officer)
/// /alerts/{id}/transcription        service callback (POST, shared token)
///
/// /chat/{alert_id}                  list thread, post message (GET, POST)
///
/// /safewalk/start                   start session (POST)
/// /safewalk/active                  current session (GET)
/// /safewalk/{id}/checkin            position check-in (POST)
/// /safewalk/{id}/end                complete (POST)
/// /safewalk/{id}/panic              escalate (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // WebSocket endpoint.
        .route("/ws", get(ws::ws_handler))
        // Alert lifecycle.
        .nest("/alerts", alerts::router())
        // Per-alert chat threads.
        .nest("/chat", chat::router())
        // Safe-walk sessions.
        .nest("/safewalk", safewalk::router())
}
