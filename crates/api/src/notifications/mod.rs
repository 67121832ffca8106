//! Delivery of room events to connected WebSocket clients.

mod router;

pub use router::run as run_notification_router;
