use std::collections::{HashMap, HashSet};

use axum::body::Bytes;
use axum::extract::ws::Message;
use guardia_core::types::{DbId, Timestamp};
use tokio::sync::{mpsc, RwLock};

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// Metadata for a single authenticated WebSocket connection.
pub struct WsConnection {
    /// Authenticated user ID.
    pub user_id: DbId,
    /// The user's role name at connect time.
    pub role: String,
    /// Channel sender for outbound messages to this connection.
    pub sender: WsSender,
    /// Rooms this connection is subscribed to.
    pub rooms: HashSet<String>,
    /// When this connection was established.
    pub connected_at: Timestamp,
}

/// Manages all active WebSocket connections and their room subscriptions.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application. Room membership is per connection, so
/// a user with two devices in the same room receives the message twice
/// (once per device).
pub struct WsManager {
    connections: RwLock<HashMap<String, WsConnection>>,
}

impl WsManager {
    /// Create a new, empty connection manager.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection already subscribed to `initial_rooms`.
    ///
    /// Returns the receiver half of the message channel so the caller can
    /// forward messages to the WebSocket sink.
    pub async fn add(
        &self,
        conn_id: String,
        user_id: DbId,
        role: String,
        initial_rooms: impl IntoIterator<Item = String>,
    ) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = WsConnection {
            user_id,
            role,
            sender: tx,
            rooms: initial_rooms.into_iter().collect(),
            connected_at: chrono::Utc::now(),
        };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    /// Remove a connection by its ID.
    pub async fn remove(&self, conn_id: &str) {
        self.connections.write().await.remove(conn_id);
    }

    /// Subscribe a connection to a room. No-op for unknown connections.
    pub async fn join_room(&self, conn_id: &str, room: &str) {
        if let Some(conn) = self.connections.write().await.get_mut(conn_id) {
            conn.rooms.insert(room.to_string());
        }
    }

    /// Unsubscribe a connection from a room. No-op for unknown connections.
    pub async fn leave_room(&self, conn_id: &str, room: &str) {
        if let Some(conn) = self.connections.write().await.get_mut(conn_id) {
            conn.rooms.remove(room);
        }
    }

    /// Send a message to every connection subscribed to `room`.
    ///
    /// Connections whose send channels are closed are silently skipped
    /// (they will be cleaned up on their next receive loop iteration).
    /// Returns the number of connections the message was sent to.
    pub async fn publish_to_room(&self, room: &str, message: Message) -> usize {
        let conns = self.connections.read().await;
        let mut count = 0;
        for conn in conns.values() {
            if conn.rooms.contains(room) {
                let _ = conn.sender.send(message.clone());
                count += 1;
            }
        }
        count
    }

    /// Number of connections currently subscribed to `room`.
    pub async fn room_size(&self, room: &str) -> usize {
        self.connections
            .read()
            .await
            .values()
            .filter(|c| c.rooms.contains(room))
            .count()
    }

    /// Return the current number of active connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a Ping frame to every connected client.
    ///
    /// Used by the heartbeat task to keep connections alive and detect
    /// stale ones.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }

    /// Drop connections whose send channel is closed (the socket task
    /// exited without removing itself). Returns how many were dropped.
    pub async fn prune_closed(&self) -> usize {
        let mut conns = self.connections.write().await;
        let before = conns.len();
        conns.retain(|_, conn| !conn.sender.is_closed());
        before - conns.len()
    }

    /// Send a Close frame to every connection, then clear the map.
    ///
    /// Used during graceful shutdown to notify all clients before the
    /// server stops accepting new connections.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}
