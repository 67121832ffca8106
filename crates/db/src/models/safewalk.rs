//! Safe-walk session model and DTOs.

use guardia_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A safe-walk session row.
///
/// While the session is active, `end_time` is the escalation deadline.
/// Terminal transitions snap it to the transition time so the expiry
/// scan never reconsiders the row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SafeWalkSession {
    pub id: DbId,
    pub user_id: DbId,
    pub status: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub start_latitude: Option<f64>,
    pub start_longitude: Option<f64>,
    pub current_latitude: Option<f64>,
    pub current_longitude: Option<f64>,
    pub created_at: Timestamp,
}

impl SafeWalkSession {
    /// Best-known position: the last check-in if any, else the start point.
    pub fn last_known_position(&self) -> (Option<f64>, Option<f64>) {
        match (self.current_latitude, self.current_longitude) {
            (Some(lat), Some(lon)) => (Some(lat), Some(lon)),
            _ => (self.start_latitude, self.start_longitude),
        }
    }
}

/// DTO for inserting a new session.
pub struct CreateSafeWalkSession {
    pub user_id: DbId,
    pub end_time: Timestamp,
    pub start_latitude: Option<f64>,
    pub start_longitude: Option<f64>,
}
