//! Room-scoped event fan-out for real-time delivery.

pub mod bus;

pub use bus::{EventBus, RoomEvent};

/// Event names published by the lifecycle engines.
///
/// Dot-separated `entity.action` names; these are the `event` field of
/// every [`RoomEvent`] and the `type` field of the WebSocket frames the
/// notification router emits.
pub mod names {
    /// A new pending alert exists; published to the responders room.
    pub const ALERT_CREATED: &str = "alert.created";
    /// An officer claimed the alert; published to the reporter's room.
    pub const ALERT_RESPONDED: &str = "alert.responded";
    /// The responder changed their sub-status; published to the reporter's room.
    pub const ALERT_STATUS_UPDATED: &str = "alert.status_updated";
    /// A chat message was posted; published to both participants' rooms.
    pub const CHAT_MESSAGE: &str = "chat.message";
    /// A safe-walk session escalated to an emergency; published to the
    /// session owner's room (the spawned alert is announced separately).
    pub const SAFEWALK_ESCALATED: &str = "safewalk.escalated";
}
