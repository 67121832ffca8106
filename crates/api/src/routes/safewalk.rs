//! Route definitions for the `/safewalk` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::safewalk;
use crate::state::AppState;

/// Routes mounted at `/safewalk`.
///
/// ```text
/// POST   /start          -> start_session
/// GET    /active         -> active_session
/// POST   /{id}/checkin   -> check_in
/// POST   /{id}/end       -> end_session
/// POST   /{id}/panic     -> panic_session
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start", post(safewalk::start_session))
        .route("/active", get(safewalk::active_session))
        .route("/{id}/checkin", post(safewalk::check_in))
        .route("/{id}/end", post(safewalk::end_session))
        .route("/{id}/panic", post(safewalk::panic_session))
}
