//! Handlers for the `/safewalk` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use guardia_core::types::DbId;
use guardia_db::models::safewalk::SafeWalkSession;
use guardia_db::repositories::SafeWalkRepo;

use crate::engine::{CheckInRequest, StartSafeWalkRequest};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/safewalk/start
///
/// Start a timed session. 409 when the caller already has one running.
pub async fn start_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<StartSafeWalkRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SafeWalkSession>>)> {
    let session = state.safewalk_engine.start(auth.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(session))))
}

/// GET /api/v1/safewalk/active
///
/// The caller's currently active session, if any.
pub async fn active_session(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Option<SafeWalkSession>>>> {
    let session = SafeWalkRepo::find_active_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse::new(session)))
}

/// POST /api/v1/safewalk/{id}/checkin
///
/// Record a position check-in. Does not extend the deadline.
pub async fn check_in(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
    Json(input): Json<CheckInRequest>,
) -> AppResult<Json<DataResponse<SafeWalkSession>>> {
    let session = state
        .safewalk_engine
        .check_in(auth.user_id, session_id, input)
        .await?;
    Ok(Json(DataResponse::new(session)))
}

/// POST /api/v1/safewalk/{id}/end
///
/// Complete the session normally.
pub async fn end_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.safewalk_engine.end(auth.user_id, session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/safewalk/{id}/panic
///
/// Escalate immediately; returns the distress alert that was spawned.
pub async fn panic_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(session_id): Path<DbId>,
) -> AppResult<(
    StatusCode,
    Json<DataResponse<guardia_db::models::alert::Alert>>,
)> {
    let alert = state
        .safewalk_engine
        .panic(auth.user_id, session_id)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(alert))))
}
