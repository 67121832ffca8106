//! Request handlers, grouped by resource.

pub mod alerts;
pub mod chat;
pub mod safewalk;
