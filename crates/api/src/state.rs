use std::sync::Arc;

use crate::config::ServerConfig;
use crate::engine::{AlertEngine, SafeWalkEngine};
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: guardia_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket room/connection manager.
    pub ws_manager: Arc<WsManager>,
    /// Room-scoped event bus.
    pub event_bus: Arc<guardia_events::EventBus>,
    /// Alert lifecycle manager.
    pub alert_engine: Arc<AlertEngine>,
    /// Safe-walk session monitor (user-facing operations).
    pub safewalk_engine: Arc<SafeWalkEngine>,
}
