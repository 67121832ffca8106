//! Alert entity model, DTOs, and view projections.

use guardia_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::user::{OfficerBrief, ReporterBrief};

/// Full alert row from the `alerts` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Alert {
    pub id: DbId,
    pub reporter_id: DbId,
    pub alert_type: String,
    pub content: Option<String>,
    pub media_ref: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub tag: Option<String>,
    pub status: String,
    pub transcription: Option<String>,
    pub transcription_keywords: Option<String>,
    pub transcription_status: String,
    pub responded_by: Option<DbId>,
    pub responded_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for inserting a new alert.
pub struct CreateAlert {
    pub reporter_id: DbId,
    pub alert_type: String,
    pub content: Option<String>,
    pub media_ref: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub tag: Option<String>,
    pub transcription_status: String,
}

/// Alert projection for the reporter's own listing: the alert plus the
/// responding officer's contact card once claimed.
#[derive(Debug, Clone, Serialize)]
pub struct AlertView {
    #[serde(flatten)]
    pub alert: Alert,
    pub responding_officer: Option<OfficerBrief>,
    pub has_chat: bool,
}

/// Alert projection for a responder's ranked feed: the alert annotated
/// with the distance from the officer and the reporter's contact card.
#[derive(Debug, Clone, Serialize)]
pub struct RankedAlert {
    #[serde(flatten)]
    pub alert: Alert,
    /// Great-circle distance from the querying officer, when both
    /// coordinate pairs are known.
    pub distance_km: Option<f64>,
    pub reporter: Option<ReporterBrief>,
}
