//! Alert lifecycle manager.
//!
//! Owns the `pending -> responded -> resolved` state machine and the
//! at-most-one-active-responder invariant. The claim is atomic: it rides
//! on the guarded `UPDATE ... WHERE status = 'pending'` in
//! [`AlertRepo::claim`], so under concurrent claims exactly one officer
//! wins and the rest are rejected with `AlreadyClaimed` -- a normal
//! outcome, not a system error.

use std::collections::HashMap;
use std::sync::Arc;

use guardia_core::alert::{AlertStatus, AlertType, ResponseStatus, TranscriptionStatus};
use guardia_core::error::CoreError;
use guardia_core::geo;
use guardia_core::rooms::{user_room, RESPONDERS_ROOM};
use guardia_core::types::DbId;
use guardia_db::models::alert::{Alert, CreateAlert, RankedAlert};
use guardia_db::models::alert_response::{AlertResponse, CreateAlertResponse};
use guardia_db::models::chat_message::CreateChatMessage;
use guardia_db::models::user::{OfficerBrief, ReporterBrief};
use guardia_db::repositories::{AlertRepo, AlertResponseRepo, ChatRepo, UserRepo};
use guardia_db::DbPool;
use guardia_events::{names, EventBus, RoomEvent};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::transcription::{TranscriptionCallback, TranscriptionClient};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /alerts`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAlertRequest {
    pub alert_type: AlertType,
    pub content: Option<String>,
    pub media_ref: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    pub tag: Option<String>,
}

/// Body of `POST /alerts/{id}/respond`.
#[derive(Debug, Deserialize, Validate)]
pub struct ClaimAlertRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub officer_latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub officer_longitude: Option<f64>,
    pub notes: Option<String>,
}

/// Body of `PUT /alerts/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateResponseStatusRequest {
    pub status: ResponseStatus,
    pub notes: Option<String>,
}

/// Result of a successful claim: the response row plus the responder's
/// contact card, built once per operation.
#[derive(Debug, Serialize)]
pub struct ClaimOutcome {
    #[serde(flatten)]
    pub response: AlertResponse,
    pub officer: Option<OfficerBrief>,
}

// ---------------------------------------------------------------------------
// AlertEngine
// ---------------------------------------------------------------------------

pub struct AlertEngine {
    pool: DbPool,
    bus: Arc<EventBus>,
    transcriber: Arc<TranscriptionClient>,
}

impl AlertEngine {
    pub fn new(pool: DbPool, bus: Arc<EventBus>, transcriber: Arc<TranscriptionClient>) -> Self {
        Self {
            pool,
            bus,
            transcriber,
        }
    }

    /// Create a new pending alert on behalf of a reporter.
    ///
    /// Voice alerts with a media reference get transcription sub-status
    /// `pending` and a fire-and-forget dispatch to the transcription
    /// service; a dispatch failure marks the sub-status `failed` and
    /// never surfaces to the reporter. Publishes `alert.created` to the
    /// responders room after the insert commits.
    pub async fn create_alert(
        &self,
        reporter_id: DbId,
        req: CreateAlertRequest,
    ) -> AppResult<Alert> {
        req.validate()?;

        let wants_transcription =
            req.alert_type == AlertType::Voice && req.media_ref.is_some();
        let transcription_status = if wants_transcription {
            TranscriptionStatus::Pending
        } else {
            TranscriptionStatus::None
        };

        let alert = AlertRepo::create(
            &self.pool,
            &CreateAlert {
                reporter_id,
                alert_type: req.alert_type.as_str().to_string(),
                content: req.content,
                media_ref: req.media_ref,
                latitude: req.latitude,
                longitude: req.longitude,
                tag: req.tag,
                transcription_status: transcription_status.as_str().to_string(),
            },
        )
        .await?;

        if wants_transcription {
            self.dispatch_transcription(&alert);
        }

        self.bus.publish(RoomEvent::new(
            RESPONDERS_ROOM,
            names::ALERT_CREATED,
            serde_json::json!({ "alert": alert }),
        ));

        Ok(alert)
    }

    /// Atomically claim a pending alert for an officer.
    ///
    /// The claim, the en-route response row (with the distance to the
    /// alert when both coordinate pairs are known), and the system chat
    /// message announcing the responder commit in one transaction, so a
    /// `responded` alert always has its response row. Publishes
    /// `alert.responded` to the reporter's private room after commit.
    pub async fn claim_alert(
        &self,
        officer_id: DbId,
        alert_id: DbId,
        req: ClaimAlertRequest,
    ) -> AppResult<ClaimOutcome> {
        req.validate()?;

        let now = chrono::Utc::now();
        let mut tx = self.pool.begin().await?;

        let alert = match AlertRepo::claim(&mut *tx, alert_id, officer_id, now).await? {
            Some(alert) => alert,
            None => {
                tx.rollback().await?;
                // Guard failed: distinguish a missing alert from a lost race.
                return match AlertRepo::find_by_id(&self.pool, alert_id).await? {
                    None => Err(AppError::Core(CoreError::NotFound {
                        entity: "Alert",
                        id: alert_id,
                    })),
                    Some(_) => Err(AppError::Core(CoreError::AlreadyClaimed(alert_id))),
                };
            }
        };

        let distance_km = match (
            req.officer_latitude,
            req.officer_longitude,
            alert.latitude,
            alert.longitude,
        ) {
            (Some(olat), Some(olon), Some(alat), Some(alon)) => {
                Some(geo::distance_km(olat, olon, alat, alon))
            }
            _ => None,
        };

        let response = AlertResponseRepo::create(
            &mut *tx,
            &CreateAlertResponse {
                alert_id,
                officer_id,
                officer_latitude: req.officer_latitude,
                officer_longitude: req.officer_longitude,
                distance_km,
                notes: req.notes,
            },
        )
        .await?;

        let officer = UserRepo::officer_brief(&self.pool, officer_id).await?;

        // System chat message announcing the responder to the reporter.
        let announcement = match &officer {
            Some(o) => format!(
                "Help is on the way! Officer {} (Badge: {}) is responding to your emergency.",
                o.full_name.as_deref().unwrap_or("Unknown"),
                o.badge_number.as_deref().unwrap_or("n/a"),
            ),
            None => "Help is on the way! An officer is responding to your emergency.".to_string(),
        };
        ChatRepo::create(
            &mut *tx,
            &CreateChatMessage {
                alert_id,
                sender_id: officer_id,
                receiver_id: alert.reporter_id,
                message: announcement,
                message_type: "auto".to_string(),
            },
        )
        .await?;

        tx.commit().await?;

        let outcome = ClaimOutcome { response, officer };

        self.bus.publish(RoomEvent::new(
            user_room(alert.reporter_id),
            names::ALERT_RESPONDED,
            serde_json::json!({ "alert_id": alert_id, "response": outcome }),
        ));

        Ok(outcome)
    }

    /// Update the claiming officer's response sub-status.
    ///
    /// `NotFound` when the alert has no active response; `Forbidden` when
    /// the active response belongs to another officer. A `resolved`
    /// sub-status also advances the parent alert to `resolved`.
    pub async fn update_response_status(
        &self,
        officer_id: DbId,
        alert_id: DbId,
        req: UpdateResponseStatusRequest,
    ) -> AppResult<AlertResponse> {
        let response = AlertResponseRepo::find_active_for_alert(&self.pool, alert_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "AlertResponse",
                id: alert_id,
            }))?;

        if response.officer_id != officer_id {
            return Err(AppError::Core(CoreError::Forbidden(
                "Only the responding officer may update this response".into(),
            )));
        }

        let updated = AlertResponseRepo::update_status(
            &self.pool,
            response.id,
            req.status.as_str(),
            req.notes.as_deref(),
        )
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AlertResponse",
            id: response.id,
        }))?;

        if req.status == ResponseStatus::Resolved {
            // Guarded on 'responded'; a false return means the alert
            // already advanced, which is fine.
            AlertRepo::mark_resolved(&self.pool, alert_id).await?;
        }

        if let Some(alert) = AlertRepo::find_by_id(&self.pool, alert_id).await? {
            self.bus.publish(RoomEvent::new(
                user_room(alert.reporter_id),
                names::ALERT_STATUS_UPDATED,
                serde_json::json!({
                    "alert_id": alert_id,
                    "response_status": req.status,
                    "alert_status": AlertStatus::parse(&alert.status),
                }),
            ));
        }

        Ok(updated)
    }

    /// Pending alerts plus the alerts this officer currently holds,
    /// annotated with distance and sorted ascending by it.
    ///
    /// Creation time descending is the base order; the final stable sort
    /// by distance puts alerts with unknown distance last.
    pub async fn rank_for_officer(
        &self,
        officer_id: DbId,
        officer_lat: Option<f64>,
        officer_lon: Option<f64>,
    ) -> AppResult<Vec<RankedAlert>> {
        let mut alerts = AlertRepo::list_pending(&self.pool).await?;
        alerts.extend(AlertRepo::list_responded_by(&self.pool, officer_id).await?);

        // Base order: newest first across both sets.
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        // One batched lookup for the reporter cards.
        let mut reporter_ids: Vec<DbId> = alerts.iter().map(|a| a.reporter_id).collect();
        reporter_ids.sort_unstable();
        reporter_ids.dedup();
        let reporters: HashMap<DbId, ReporterBrief> =
            UserRepo::reporter_briefs(&self.pool, &reporter_ids)
                .await?
                .into_iter()
                .map(|r| (r.id, r))
                .collect();

        let mut ranked = Vec::with_capacity(alerts.len());
        for alert in alerts {
            let distance_km = match (officer_lat, officer_lon, alert.latitude, alert.longitude) {
                (Some(olat), Some(olon), Some(alat), Some(alon)) => {
                    Some(geo::distance_km(olat, olon, alat, alon))
                }
                _ => None,
            };
            let reporter = reporters.get(&alert.reporter_id).cloned();
            ranked.push(RankedAlert {
                alert,
                distance_km,
                reporter,
            });
        }

        // Final key: distance ascending, unknown distances last. sort_by
        // is stable, so the creation-time base order breaks ties.
        ranked.sort_by(|a, b| match (a.distance_km, b.distance_km) {
            (Some(da), Some(db)) => da.total_cmp(&db),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        Ok(ranked)
    }

    /// Apply a transcription result delivered by the service callback.
    pub async fn apply_transcription(
        &self,
        alert_id: DbId,
        callback: TranscriptionCallback,
    ) -> AppResult<()> {
        if AlertRepo::find_by_id(&self.pool, alert_id).await?.is_none() {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Alert",
                id: alert_id,
            }));
        }

        match (callback.failed, callback.transcription) {
            (false, Some(text)) => {
                AlertRepo::set_transcription(
                    &self.pool,
                    alert_id,
                    &text,
                    callback.keywords.as_deref(),
                )
                .await?;
            }
            _ => {
                AlertRepo::mark_transcription_failed(&self.pool, alert_id).await?;
            }
        }
        Ok(())
    }

    /// Fire-and-forget dispatch of a transcription job. A failed dispatch
    /// marks the alert's transcription `failed`; it never blocks or fails
    /// the create path.
    fn dispatch_transcription(&self, alert: &Alert) {
        let Some(media_ref) = alert.media_ref.clone() else {
            return;
        };
        let alert_id = alert.id;
        let pool = self.pool.clone();
        let transcriber = Arc::clone(&self.transcriber);

        tokio::spawn(async move {
            if let Err(e) = transcriber.dispatch(alert_id, &media_ref).await {
                tracing::warn!(alert_id, error = %e, "Transcription dispatch failed");
                if let Err(e) = AlertRepo::mark_transcription_failed(&pool, alert_id).await {
                    tracing::error!(alert_id, error = %e, "Failed to mark transcription failed");
                }
            }
        });
    }
}
