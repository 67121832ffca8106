//! WebSocket infrastructure for real-time delivery.
//!
//! Connections authenticate on upgrade and subscribe to rooms; the
//! notification router fans room events out through [`WsManager`].

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
