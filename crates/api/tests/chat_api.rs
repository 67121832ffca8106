//! Integration tests for per-alert chat threads.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_app_with_state, build_test_app, create_citizen, create_officer, get_auth,
    post_json_auth, test_state, token_for,
};
use guardia_core::rooms::user_room;
use sqlx::PgPool;

/// Create an alert and claim it, returning (alert_id, reporter, officer).
async fn claimed_alert(pool: &PgPool, app: &axum::Router) -> (i64, i64, i64) {
    let reporter = create_citizen(pool, "ana").await;
    let officer = create_officer(pool, "bo").await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/alerts",
        &token_for(reporter, "citizen"),
        serde_json::json!({ "alert_type": "distress", "content": "Need help" }),
    )
    .await;
    let alert_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/alerts/{alert_id}/respond"),
        &token_for(officer, "officer"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    (alert_id, reporter, officer)
}

// ---------------------------------------------------------------------------
// Test: chat is closed until an officer claims the alert
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn chat_requires_claimed_alert(pool: PgPool) {
    let reporter = create_citizen(&pool, "ana").await;
    let token = token_for(reporter, "citizen");
    let app = build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/alerts",
        &token,
        serde_json::json!({ "alert_type": "text", "content": "Need help" }),
    )
    .await;
    let alert_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        app,
        &format!("/api/v1/chat/{alert_id}"),
        &token,
        serde_json::json!({ "message": "anyone there?" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_STATE");
}

// ---------------------------------------------------------------------------
// Test: reporter and officer exchange messages
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn participants_exchange_messages(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (alert_id, reporter, officer) = claimed_alert(&pool, &app).await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/chat/{alert_id}"),
        &token_for(reporter, "citizen"),
        serde_json::json!({ "message": "I am by the north exit" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["sender_id"], reporter);
    assert_eq!(json["data"]["receiver_id"], officer);
    assert_eq!(json["data"]["message_type"], "text");

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/chat/{alert_id}"),
        &token_for(officer, "officer"),
        serde_json::json!({ "message": "Two minutes out" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["receiver_id"], reporter);

    // Thread is oldest-first: auto announcement, then the two replies.
    let response = get_auth(
        app,
        &format!("/api/v1/chat/{alert_id}"),
        &token_for(reporter, "citizen"),
    )
    .await;
    let json = body_json(response).await;
    let messages = json["data"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0]["message_type"], "auto");
    assert_eq!(messages[1]["message"], "I am by the north exit");
    assert_eq!(messages[2]["message"], "Two minutes out");
}

// ---------------------------------------------------------------------------
// Test: a sent message is announced to both participants' rooms
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn message_events_reach_both_participants(pool: PgPool) {
    let state = test_state(pool.clone());
    let bus = state.event_bus.clone();
    let app = build_app_with_state(state);
    let (alert_id, reporter, officer) = claimed_alert(&pool, &app).await;

    // Subscribe after the claim so only the chat events are observed.
    let mut rx = bus.subscribe();

    let response = post_json_auth(
        app,
        &format!("/api/v1/chat/{alert_id}"),
        &token_for(reporter, "citizen"),
        serde_json::json!({ "message": "I moved to the parking lot" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    assert_eq!(first.event, "chat.message");
    assert_eq!(second.event, "chat.message");

    let rooms = [first.room.as_str(), second.room.as_str()];
    assert!(rooms.contains(&user_room(officer).as_str()));
    assert!(rooms.contains(&user_room(reporter).as_str()));
    assert_eq!(first.payload["message"]["message"], "I moved to the parking lot");
}

// ---------------------------------------------------------------------------
// Test: listing marks the caller's inbound messages read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn listing_marks_inbound_messages_read(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (alert_id, reporter, officer) = claimed_alert(&pool, &app).await;

    post_json_auth(
        app.clone(),
        &format!("/api/v1/chat/{alert_id}"),
        &token_for(officer, "officer"),
        serde_json::json!({ "message": "On my way" }),
    )
    .await;

    let response = get_auth(
        app,
        &format!("/api/v1/chat/{alert_id}"),
        &token_for(reporter, "citizen"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let unread: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM chat_messages
         WHERE alert_id = $1 AND receiver_id = $2 AND read_at IS NULL",
    )
    .bind(alert_id)
    .bind(reporter)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(unread, 0);
}

// ---------------------------------------------------------------------------
// Test: outsiders cannot read or post
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn outsiders_are_rejected(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (alert_id, _reporter, _officer) = claimed_alert(&pool, &app).await;

    let outsider = create_citizen(&pool, "dee").await;
    let token = token_for(outsider, "citizen");

    let response = get_auth(app.clone(), &format!("/api/v1/chat/{alert_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        app,
        &format!("/api/v1/chat/{alert_id}"),
        &token,
        serde_json::json!({ "message": "let me in" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
