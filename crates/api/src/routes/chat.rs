//! Route definitions for per-alert chat threads.

use axum::routing::get;
use axum::Router;

use crate::handlers::chat;
use crate::state::AppState;

/// Routes mounted at `/chat`.
///
/// ```text
/// GET    /{alert_id}  -> list_messages
/// POST   /{alert_id}  -> send_message
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{alert_id}",
        get(chat::list_messages).post(chat::send_message),
    )
}
