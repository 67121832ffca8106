//! Liveness pings for connected responders and reporters.
//!
//! A safe-walk escalation or a new alert is only as fast as the sockets
//! it fans out to, so the heartbeat keeps idle connections from being
//! reaped by proxies and sweeps out entries whose socket task already
//! exited.

use std::sync::Arc;
use std::time::Duration;

use crate::ws::manager::WsManager;

/// Spawn the heartbeat task.
///
/// Every `interval_secs` (see `WS_HEARTBEAT_INTERVAL_SECS`) it pings all
/// registered connections and prunes the ones whose channels are closed.
/// Runs until aborted during shutdown.
pub fn start_heartbeat(
    ws_manager: Arc<WsManager>,
    interval_secs: u64,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

        loop {
            interval.tick().await;
            ws_manager.ping_all().await;
            let pruned = ws_manager.prune_closed().await;
            let active = ws_manager.connection_count().await;
            if pruned > 0 {
                tracing::info!(pruned, active, "Pruned dead WebSocket connections");
            } else {
                tracing::debug!(active, "WebSocket heartbeat tick");
            }
        }
    })
}
