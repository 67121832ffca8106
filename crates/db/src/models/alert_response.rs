//! Alert response model and DTOs.

use guardia_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A successful claim by an officer, one row per (alert, officer).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AlertResponse {
    pub id: DbId,
    pub alert_id: DbId,
    pub officer_id: DbId,
    pub status: String,
    pub officer_latitude: Option<f64>,
    pub officer_longitude: Option<f64>,
    pub distance_km: Option<f64>,
    pub notes: Option<String>,
    pub response_time: Timestamp,
}

/// DTO for inserting a new response at claim time.
pub struct CreateAlertResponse {
    pub alert_id: DbId,
    pub officer_id: DbId,
    pub officer_latitude: Option<f64>,
    pub officer_longitude: Option<f64>,
    pub distance_km: Option<f64>,
    pub notes: Option<String>,
}
