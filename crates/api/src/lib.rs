//! HTTP + WebSocket surface for the alert/safe-walk coordination engine.

pub mod auth;
pub mod background;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod notifications;
pub mod response;
pub mod routes;
pub mod state;
pub mod transcription;
pub mod ws;
