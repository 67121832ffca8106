//! Handlers for the `/alerts` resource.
//!
//! Citizens create and list their own alerts; officers see the ranked
//! feed and drive the response lifecycle. The transcription callback is
//! the one endpoint here not authenticated by JWT: the external service
//! presents a shared token instead.

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::Json;
use guardia_core::error::CoreError;
use guardia_core::types::DbId;
use guardia_db::models::alert::AlertView;
use guardia_db::repositories::{AlertRepo, ChatRepo, UserRepo};
use serde::Deserialize;

use crate::engine::{ClaimAlertRequest, CreateAlertRequest, UpdateResponseStatusRequest};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireOfficer;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::transcription::TranscriptionCallback;

/// Header the transcription service must present on its callback.
const CALLBACK_TOKEN_HEADER: &str = "x-callback-token";

/// Query parameters for `GET /alerts/nearby`.
#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// POST /api/v1/alerts
///
/// Create a new pending alert on behalf of the authenticated reporter.
pub async fn create_alert(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateAlertRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<guardia_db::models::alert::Alert>>)> {
    let alert = state.alert_engine.create_alert(auth.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(alert))))
}

/// GET /api/v1/alerts
///
/// List the authenticated reporter's own alerts, newest first, each with
/// the responding officer's card (once claimed) and a chat-exists flag.
pub async fn list_my_alerts(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<AlertView>>>> {
    let alerts = AlertRepo::list_for_reporter(&state.pool, auth.user_id).await?;

    let mut views = Vec::with_capacity(alerts.len());
    for alert in alerts {
        let responding_officer = match alert.responded_by {
            Some(officer_id) => UserRepo::officer_brief(&state.pool, officer_id).await?,
            None => None,
        };
        let has_chat = ChatRepo::exists_for_alert(&state.pool, alert.id).await?;
        views.push(AlertView {
            alert,
            responding_officer,
            has_chat,
        });
    }

    Ok(Json(DataResponse::new(views)))
}

/// GET /api/v1/alerts/nearby
///
/// Ranked feed for officers: pending alerts plus the officer's own
/// claimed alerts, sorted by distance when the officer supplies a
/// position.
pub async fn nearby_alerts(
    RequireOfficer(auth): RequireOfficer,
    State(state): State<AppState>,
    Query(params): Query<NearbyQuery>,
) -> AppResult<Json<DataResponse<Vec<guardia_db::models::alert::RankedAlert>>>> {
    let ranked = state
        .alert_engine
        .rank_for_officer(auth.user_id, params.latitude, params.longitude)
        .await?;
    Ok(Json(DataResponse::new(ranked)))
}

/// POST /api/v1/alerts/{id}/respond
///
/// Claim a pending alert. Returns 409 when another officer got there
/// first.
pub async fn respond_to_alert(
    RequireOfficer(auth): RequireOfficer,
    State(state): State<AppState>,
    Path(alert_id): Path<DbId>,
    Json(input): Json<ClaimAlertRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<crate::engine::ClaimOutcome>>)> {
    let outcome = state
        .alert_engine
        .claim_alert(auth.user_id, alert_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(outcome))))
}

/// PUT /api/v1/alerts/{id}/status
///
/// Update the claiming officer's response sub-status. A `resolved`
/// sub-status also resolves the alert itself.
pub async fn update_response_status(
    RequireOfficer(auth): RequireOfficer,
    State(state): State<AppState>,
    Path(alert_id): Path<DbId>,
    Json(input): Json<UpdateResponseStatusRequest>,
) -> AppResult<Json<DataResponse<guardia_db::models::alert_response::AlertResponse>>> {
    let response = state
        .alert_engine
        .update_response_status(auth.user_id, alert_id, input)
        .await?;
    Ok(Json(DataResponse::new(response)))
}

/// POST /api/v1/alerts/{id}/transcription
///
/// Callback from the transcription service. Authenticated by the shared
/// callback token, not a user JWT.
pub async fn transcription_callback(
    State(state): State<AppState>,
    Path(alert_id): Path<DbId>,
    headers: HeaderMap,
    Json(input): Json<TranscriptionCallback>,
) -> AppResult<StatusCode> {
    let presented = headers
        .get(CALLBACK_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Missing callback token".into()))
        })?;

    if presented != state.config.transcription_callback_token {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid callback token".into(),
        )));
    }

    state
        .alert_engine
        .apply_transcription(alert_id, input)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
