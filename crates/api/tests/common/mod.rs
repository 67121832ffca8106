#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use guardia_api::auth::jwt::{generate_access_token, JwtConfig};
use guardia_api::config::ServerConfig;
use guardia_api::engine::{AlertEngine, SafeWalkEngine};
use guardia_api::routes;
use guardia_api::state::AppState;
use guardia_api::transcription::TranscriptionClient;
use guardia_api::ws::WsManager;
use guardia_core::types::DbId;
use guardia_events::EventBus;

/// Shared secret for tokens minted in tests.
pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Shared secret for the transcription callback endpoint.
pub const TEST_CALLBACK_TOKEN: &str = "test-callback-token";

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        access_token_expiry_mins: 5,
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        safewalk_monitor_interval_secs: 30,
        ws_heartbeat_interval_secs: 30,
        transcription_url: "http://localhost:8090".to_string(),
        transcription_callback_token: TEST_CALLBACK_TOKEN.to_string(),
        jwt: test_jwt_config(),
    }
}

/// Build the shared application state the way `main.rs` does.
pub fn test_state(pool: PgPool) -> AppState {
    let config = Arc::new(test_config());
    let event_bus = Arc::new(EventBus::default());
    let transcriber = Arc::new(TranscriptionClient::new(config.transcription_url.clone()));

    let alert_engine = Arc::new(AlertEngine::new(
        pool.clone(),
        Arc::clone(&event_bus),
        transcriber,
    ));
    let safewalk_engine = Arc::new(SafeWalkEngine::new(pool.clone(), Arc::clone(&event_bus)));

    AppState {
        pool,
        config,
        ws_manager: Arc::new(WsManager::new()),
        event_bus,
        alert_engine,
        safewalk_engine,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_with_state(test_state(pool))
}

pub fn build_app_with_state(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user row directly and return its id.
pub async fn create_user(pool: &PgPool, full_name: &str, role: &str) -> DbId {
    let badge = if role == "officer" {
        Some(format!("B-{full_name}"))
    } else {
        None
    };
    sqlx::query_scalar(
        "INSERT INTO users (full_name, role, badge_number, phone)
         VALUES ($1, $2, $3, '555-0100') RETURNING id",
    )
    .bind(full_name)
    .bind(role)
    .bind(badge)
    .fetch_one(pool)
    .await
    .expect("user insert should succeed")
}

pub async fn create_citizen(pool: &PgPool, name: &str) -> DbId {
    create_user(pool, name, "citizen").await
}

pub async fn create_officer(pool: &PgPool, name: &str) -> DbId {
    create_user(pool, name, "officer").await
}

/// Mint an access token for a test user.
pub fn token_for(user_id: DbId, role: &str) -> String {
    generate_access_token(user_id, role, &test_jwt_config()).expect("token generation")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST with an arbitrary extra header (used by the transcription callback).
pub async fn post_json_with_header(
    app: Router,
    uri: &str,
    header: (&str, &str),
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header.0, header.1)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}
