//! User entity model and projections.

use guardia_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub full_name: Option<String>,
    pub role: String,
    pub account_status: String,
    pub badge_number: Option<String>,
    pub phone: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Compact officer projection attached to alert views.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OfficerBrief {
    pub id: DbId,
    pub full_name: Option<String>,
    pub badge_number: Option<String>,
    pub phone: Option<String>,
}

/// Compact reporter projection attached to ranked alerts.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReporterBrief {
    pub id: DbId,
    pub full_name: Option<String>,
    pub phone: Option<String>,
}
