//! Readiness endpoint, mounted at the root (not under `/api/v1`).
//!
//! Dispatchers point their uptime checks here. The endpoint answers 503
//! when Postgres is unreachable so a load balancer stops routing to an
//! instance that cannot serve alert traffic.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthReport {
    status: &'static str,
    database: &'static str,
    version: &'static str,
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let db_up = guardia_db::health_check(&state.pool).await.is_ok();

    let report = HealthReport {
        status: if db_up { "ok" } else { "degraded" },
        database: if db_up { "up" } else { "down" },
        version: env!("CARGO_PKG_VERSION"),
    };
    let code = if db_up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(report))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
