//! Bridges the event bus to WebSocket rooms.
//!
//! Publishers (the engines) never touch sockets; they hand a
//! [`RoomEvent`] to the bus after the state transition commits, and this
//! task fans it out to every connection subscribed to the event's room.

use std::sync::Arc;

use axum::extract::ws::Message;
use guardia_events::{EventBus, RoomEvent};
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use crate::ws::WsManager;

/// Run the notification router loop.
///
/// Consumes events from the bus until `cancel` is triggered or the bus
/// is dropped. A lagged receiver logs and keeps going; dropped events
/// are acceptable because every event reflects state already durable in
/// the database.
pub async fn run(bus: Arc<EventBus>, ws_manager: Arc<WsManager>, cancel: CancellationToken) {
    let mut rx = bus.subscribe();
    tracing::info!("Notification router started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Notification router stopping");
                break;
            }
            result = rx.recv() => {
                match result {
                    Ok(event) => deliver(&ws_manager, event).await,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Notification router lagged, events dropped");
                    }
                    Err(RecvError::Closed) => {
                        tracing::info!("Event bus closed, notification router exiting");
                        break;
                    }
                }
            }
        }
    }
}

/// Serialize one event and push it to its room.
async fn deliver(ws_manager: &WsManager, event: RoomEvent) {
    let frame = serde_json::json!({
        "event": event.event,
        "payload": event.payload,
        "timestamp": event.timestamp,
    });

    let text = match serde_json::to_string(&frame) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(event = %event.event, error = %e, "Failed to serialize event");
            return;
        }
    };

    let delivered = ws_manager
        .publish_to_room(&event.room, Message::Text(text.into()))
        .await;
    tracing::debug!(
        event = %event.event,
        room = %event.room,
        delivered,
        "Event delivered"
    );
}
