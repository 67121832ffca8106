//! Route definitions for the `/alerts` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::alerts;
use crate::state::AppState;

/// Routes mounted at `/alerts`.
///
/// ```text
/// POST   /                     -> create_alert
/// GET    /                     -> list_my_alerts
/// GET    /nearby               -> nearby_alerts (officer)
/// POST   /{id}/respond         -> respond_to_alert (officer)
/// PUT    /{id}/status          -> update_response_status (officer)
/// POST   /{id}/transcription   -> transcription_callback (shared token)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(alerts::create_alert).get(alerts::list_my_alerts))
        .route("/nearby", get(alerts::nearby_alerts))
        .route("/{id}/respond", post(alerts::respond_to_alert))
        .route("/{id}/status", put(alerts::update_response_status))
        .route("/{id}/transcription", post(alerts::transcription_callback))
}
