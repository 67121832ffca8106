//! Row models and DTOs.
//!
//! Status columns are TEXT in the database; rows carry them as `String`
//! and the engines convert through the `guardia_core` enums at the
//! decision points.

pub mod alert;
pub mod alert_response;
pub mod chat_message;
pub mod safewalk;
pub mod user;
