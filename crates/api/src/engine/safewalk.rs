//! Safe-walk session monitor: user-facing transitions and the shared
//! escalation path.
//!
//! Every transition requires the session to still be `active`, enforced
//! by the guarded updates in [`SafeWalkRepo`]. That single guard is what
//! resolves the race between a user's explicit end/panic and the
//! background expiry monitor: both paths attempt the same conditional
//! transition, exactly one wins, and the loser backs off silently.

use std::sync::Arc;

use guardia_core::alert::{AlertType, TranscriptionStatus};
use guardia_core::error::CoreError;
use guardia_core::rooms::{user_room, RESPONDERS_ROOM};
use guardia_core::safewalk::SessionStatus;
use guardia_core::types::DbId;
use guardia_db::models::alert::{Alert, CreateAlert};
use guardia_db::models::safewalk::{CreateSafeWalkSession, SafeWalkSession};
use guardia_db::repositories::{AlertRepo, SafeWalkRepo};
use guardia_db::DbPool;
use guardia_events::{names, EventBus, RoomEvent};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Category tag for alerts spawned by escalation.
const ESCALATION_TAG: &str = "police";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body of `POST /safewalk/start`.
#[derive(Debug, Deserialize, Validate)]
pub struct StartSafeWalkRequest {
    /// Session length; capped at 24 hours.
    #[validate(range(min = 1, max = 1440))]
    pub duration_minutes: i64,
    #[validate(range(min = -90.0, max = 90.0))]
    pub start_latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub start_longitude: Option<f64>,
}

/// Body of `POST /safewalk/{id}/checkin`.
#[derive(Debug, Deserialize, Validate)]
pub struct CheckInRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

// ---------------------------------------------------------------------------
// SafeWalkEngine
// ---------------------------------------------------------------------------

pub struct SafeWalkEngine {
    pool: DbPool,
    bus: Arc<EventBus>,
}

impl SafeWalkEngine {
    pub fn new(pool: DbPool, bus: Arc<EventBus>) -> Self {
        Self { pool, bus }
    }

    /// Start a new session for a user.
    ///
    /// Rejected with `AlreadyActive` when the user owns an active session
    /// whose deadline has not passed. An active-but-expired session (a
    /// monitor tick that hasn't run yet) is lazily escalated first, then
    /// the new session is created.
    pub async fn start(
        &self,
        user_id: DbId,
        req: StartSafeWalkRequest,
    ) -> AppResult<SafeWalkSession> {
        req.validate()?;
        let now = chrono::Utc::now();

        if let Some(existing) = SafeWalkRepo::find_active_for_user(&self.pool, user_id).await? {
            if existing.end_time >= now {
                return Err(AppError::Core(CoreError::AlreadyActive(existing.id)));
            }
            // Self-healing: the monitor hasn't caught this one yet.
            tracing::info!(
                session_id = existing.id,
                user_id,
                "Escalating stale session before starting a new one"
            );
            self.escalate_expired(&existing).await?;
        }

        let session = SafeWalkRepo::create(
            &self.pool,
            &CreateSafeWalkSession {
                user_id,
                end_time: now + chrono::Duration::minutes(req.duration_minutes),
                start_latitude: req.start_latitude,
                start_longitude: req.start_longitude,
            },
        )
        .await?;

        Ok(session)
    }

    /// Record a liveness check-in: updates the current position only.
    /// The deadline is deliberately not extended.
    pub async fn check_in(
        &self,
        user_id: DbId,
        session_id: DbId,
        req: CheckInRequest,
    ) -> AppResult<SafeWalkSession> {
        req.validate()?;
        let session = self.owned_session(user_id, session_id).await?;

        let updated =
            SafeWalkRepo::update_position(&self.pool, session.id, req.latitude, req.longitude)
                .await?;
        if !updated {
            return Err(self.not_active_error(session.id).await);
        }

        SafeWalkRepo::find_by_id(&self.pool, session_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "SafeWalkSession",
                id: session_id,
            }))
    }

    /// End a session normally. Snaps the deadline to the completion time
    /// so the expiry scan never reconsiders it.
    pub async fn end(&self, user_id: DbId, session_id: DbId) -> AppResult<()> {
        let session = self.owned_session(user_id, session_id).await?;

        let completed = SafeWalkRepo::complete(&self.pool, session.id, chrono::Utc::now()).await?;
        if !completed {
            return Err(self.not_active_error(session.id).await);
        }
        Ok(())
    }

    /// Panic button: escalate immediately and spawn a distress alert.
    /// Returns the spawned alert.
    pub async fn panic(&self, user_id: DbId, session_id: DbId) -> AppResult<Alert> {
        let session = self.owned_session(user_id, session_id).await?;

        let Some(escalated) =
            SafeWalkRepo::escalate(&self.pool, session.id, chrono::Utc::now()).await?
        else {
            return Err(self.not_active_error(session.id).await);
        };

        self.spawn_escalation_alert(&escalated, "Panic button pressed during Safe Walk.")
            .await
    }

    /// Escalate a session whose deadline has passed.
    ///
    /// Shared by the background monitor and the lazy path in [`start`].
    /// Returns `Ok(None)` when a concurrent transition (user end/panic or
    /// another tick) already moved the session out of `active`; that case
    /// is silently skipped and no alert is spawned. The spawned alert is
    /// built from the row as escalated, so a check-in that landed after
    /// the caller's scan still reaches responders.
    ///
    /// [`start`]: SafeWalkEngine::start
    pub async fn escalate_expired(
        &self,
        session: &SafeWalkSession,
    ) -> AppResult<Option<Alert>> {
        let Some(escalated) =
            SafeWalkRepo::escalate(&self.pool, session.id, chrono::Utc::now()).await?
        else {
            tracing::debug!(
                session_id = session.id,
                "Session already left active state, skipping escalation"
            );
            return Ok(None);
        };

        let alert = self
            .spawn_escalation_alert(&escalated, "Safe Walk timer expired. User did not check in.")
            .await?;
        Ok(Some(alert))
    }

    /// Insert the escalation alert and publish the delivery events.
    /// The spawned alert carries no back-reference to the session.
    async fn spawn_escalation_alert(
        &self,
        session: &SafeWalkSession,
        content: &str,
    ) -> AppResult<Alert> {
        let (latitude, longitude) = session.last_known_position();

        let alert = AlertRepo::create(
            &self.pool,
            &CreateAlert {
                reporter_id: session.user_id,
                alert_type: AlertType::Distress.as_str().to_string(),
                content: Some(content.to_string()),
                media_ref: None,
                latitude,
                longitude,
                tag: Some(ESCALATION_TAG.to_string()),
                transcription_status: TranscriptionStatus::None.as_str().to_string(),
            },
        )
        .await?;

        tracing::info!(
            session_id = session.id,
            user_id = session.user_id,
            alert_id = alert.id,
            "Safe-walk session escalated to emergency alert"
        );

        self.bus.publish(RoomEvent::new(
            RESPONDERS_ROOM,
            names::ALERT_CREATED,
            serde_json::json!({ "alert": alert }),
        ));
        self.bus.publish(RoomEvent::new(
            user_room(session.user_id),
            names::SAFEWALK_ESCALATED,
            serde_json::json!({ "session_id": session.id, "alert_id": alert.id }),
        ));

        Ok(alert)
    }

    /// Build the error for a transition whose `active` guard failed,
    /// naming the terminal state the session reached in the meantime.
    async fn not_active_error(&self, session_id: DbId) -> AppError {
        let status = match SafeWalkRepo::find_by_id(&self.pool, session_id).await {
            Ok(Some(s)) => SessionStatus::parse(&s.status),
            _ => None,
        };
        let message = match status {
            Some(s) if s.is_terminal() => format!("Session already {}", s.as_str()),
            _ => "Session is not active".to_string(),
        };
        AppError::Core(CoreError::InvalidState(message))
    }

    /// Fetch a session and verify the caller owns it.
    async fn owned_session(
        &self,
        user_id: DbId,
        session_id: DbId,
    ) -> AppResult<SafeWalkSession> {
        let session = SafeWalkRepo::find_by_id(&self.pool, session_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "SafeWalkSession",
                id: session_id,
            }))?;

        if session.user_id != user_id {
            return Err(AppError::Core(CoreError::Forbidden(
                "Not your safe-walk session".into(),
            )));
        }
        Ok(session)
    }
}
