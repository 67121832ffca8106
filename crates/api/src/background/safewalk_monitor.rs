//! Periodic escalation of expired safe-walk sessions.
//!
//! Scans for sessions still `active` past their deadline and escalates
//! each one through the engine. The engine's guarded transition means a
//! session the user ends or panics between the scan and the escalation
//! is skipped without spawning an alert, so this loop never needs to
//! coordinate with the request path.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use guardia_db::repositories::SafeWalkRepo;
use guardia_db::DbPool;
use tokio_util::sync::CancellationToken;

use crate::engine::SafeWalkEngine;

/// Run the expiry monitor loop.
///
/// Ticks every `interval_secs` until `cancel` is triggered. A failure on
/// one session is logged and does not stop the scan or the loop.
pub async fn run(
    pool: DbPool,
    engine: Arc<SafeWalkEngine>,
    interval_secs: u64,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs, "Safe-walk expiry monitor started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Safe-walk expiry monitor stopping");
                break;
            }
            _ = interval.tick() => {
                scan_once(&pool, &engine).await;
            }
        }
    }
}

/// One scan pass: fetch expired-but-active sessions and escalate each.
async fn scan_once(pool: &DbPool, engine: &SafeWalkEngine) {
    let expired = match SafeWalkRepo::find_expired_active(pool, Utc::now()).await {
        Ok(sessions) => sessions,
        Err(e) => {
            tracing::error!(error = %e, "Expiry scan query failed");
            return;
        }
    };

    if expired.is_empty() {
        tracing::debug!("Expiry scan: no expired sessions");
        return;
    }

    tracing::info!(count = expired.len(), "Expiry scan: escalating sessions");

    for session in &expired {
        match engine.escalate_expired(session).await {
            Ok(Some(alert)) => {
                tracing::info!(
                    session_id = session.id,
                    alert_id = alert.id,
                    "Expired session escalated"
                );
            }
            Ok(None) => {
                // Lost the race to a user action; nothing to do.
            }
            Err(e) => {
                tracing::error!(
                    session_id = session.id,
                    error = %e,
                    "Failed to escalate expired session"
                );
            }
        }
    }
}
