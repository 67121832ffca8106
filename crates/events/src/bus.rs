//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish side of the fan-out layer. Engines publish
//! a [`RoomEvent`] *after* the corresponding state transition has durably
//! committed; the notification router subscribes and forwards each event
//! into the named WebSocket room. Delivery is best-effort and
//! at-most-once: there is no persistence and no replay, and a publish
//! with zero subscribers is silently dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// RoomEvent
// ---------------------------------------------------------------------------

/// A state-change notification addressed to a single room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomEvent {
    /// Target room name (see `guardia_core::rooms`).
    pub room: String,

    /// Dot-separated event name, e.g. `"alert.created"`.
    pub event: String,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was published (UTC).
    pub timestamp: DateTime<Utc>,
}

impl RoomEvent {
    /// Create an event addressed to `room` with the given name and payload.
    pub fn new(
        room: impl Into<String>,
        event: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            room: room.into(),
            event: event.into(),
            payload,
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`RoomEvent`]. Events on a single
/// bus are observed in publish order; the bus is not part of the
/// consistency boundary, so a dropped event never rolls back a committed
/// transition.
pub struct EventBus {
    sender: broadcast::Sender<RoomEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: RoomEvent) {
        // Ignore the SendError -- it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<RoomEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(RoomEvent::new(
            "user_7",
            "alert.responded",
            serde_json::json!({"alert_id": 42}),
        ));

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.room, "user_7");
        assert_eq!(received.event, "alert.responded");
        assert_eq!(received.payload["alert_id"], 42);
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(RoomEvent::new(
            "responders",
            "alert.created",
            serde_json::json!({}),
        ));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert_eq!(e1.event, "alert.created");
        assert_eq!(e2.event, "alert.created");
    }

    #[tokio::test]
    async fn events_arrive_in_publish_order() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        for i in 0..5 {
            bus.publish(RoomEvent::new(
                "user_1",
                "chat.message",
                serde_json::json!({"seq": i}),
            ));
        }

        for i in 0..5 {
            let event = rx.recv().await.expect("should receive in order");
            assert_eq!(event.payload["seq"], i);
        }
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(RoomEvent::new("responders", "alert.created", serde_json::json!({})));
    }
}
