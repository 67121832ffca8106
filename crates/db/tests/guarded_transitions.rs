//! Repository-level tests for the guarded conditional updates that
//! serialize concurrent lifecycle transitions.

use chrono::Utc;
use guardia_db::models::alert::CreateAlert;
use guardia_db::models::safewalk::CreateSafeWalkSession;
use guardia_db::repositories::{AlertRepo, SafeWalkRepo};
use sqlx::PgPool;

async fn seed_user(pool: &PgPool, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO users (full_name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

fn text_alert(reporter_id: i64) -> CreateAlert {
    CreateAlert {
        reporter_id,
        alert_type: "text".to_string(),
        content: Some("help".to_string()),
        media_ref: None,
        latitude: None,
        longitude: None,
        tag: None,
        transcription_status: "none".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Alert claim guard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn claim_succeeds_once_then_returns_none(pool: PgPool) {
    let reporter = seed_user(&pool, "ana").await;
    let officer_a = seed_user(&pool, "bo").await;
    let officer_b = seed_user(&pool, "cy").await;

    let alert = AlertRepo::create(&pool, &text_alert(reporter)).await.unwrap();

    let won = AlertRepo::claim(&pool, alert.id, officer_a, Utc::now())
        .await
        .unwrap();
    let claimed = won.expect("first claim should win");
    assert_eq!(claimed.status, "responded");
    assert_eq!(claimed.responded_by, Some(officer_a));

    // Second claimer observes no pending row.
    let lost = AlertRepo::claim(&pool, alert.id, officer_b, Utc::now())
        .await
        .unwrap();
    assert!(lost.is_none());

    // And the row still records the first winner.
    let row = AlertRepo::find_by_id(&pool, alert.id).await.unwrap().unwrap();
    assert_eq!(row.responded_by, Some(officer_a));
}

/// The claim and the rows written alongside it share one transaction;
/// if that transaction rolls back, the alert is pending again.
#[sqlx::test(migrations = "./migrations")]
async fn claim_rolls_back_with_its_transaction(pool: PgPool) {
    let reporter = seed_user(&pool, "ana").await;
    let officer = seed_user(&pool, "bo").await;

    let alert = AlertRepo::create(&pool, &text_alert(reporter)).await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    let claimed = AlertRepo::claim(&mut *tx, alert.id, officer, Utc::now())
        .await
        .unwrap();
    assert!(claimed.is_some());
    tx.rollback().await.unwrap();

    let row = AlertRepo::find_by_id(&pool, alert.id).await.unwrap().unwrap();
    assert_eq!(row.status, "pending");
    assert_eq!(row.responded_by, None);

    // The alert is claimable again after the rollback.
    let reclaimed = AlertRepo::claim(&pool, alert.id, officer, Utc::now())
        .await
        .unwrap();
    assert!(reclaimed.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn mark_resolved_requires_responded_state(pool: PgPool) {
    let reporter = seed_user(&pool, "ana").await;
    let officer = seed_user(&pool, "bo").await;

    let alert = AlertRepo::create(&pool, &text_alert(reporter)).await.unwrap();

    // Pending alerts cannot jump straight to resolved.
    assert!(!AlertRepo::mark_resolved(&pool, alert.id).await.unwrap());

    AlertRepo::claim(&pool, alert.id, officer, Utc::now())
        .await
        .unwrap();
    assert!(AlertRepo::mark_resolved(&pool, alert.id).await.unwrap());

    // Resolving twice is a no-op.
    assert!(!AlertRepo::mark_resolved(&pool, alert.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Safe-walk session guards
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn session_transitions_are_exactly_once(pool: PgPool) {
    let user = seed_user(&pool, "ana").await;

    let session = SafeWalkRepo::create(
        &pool,
        &CreateSafeWalkSession {
            user_id: user,
            end_time: Utc::now() + chrono::Duration::minutes(30),
            start_latitude: Some(59.33),
            start_longitude: Some(18.06),
        },
    )
    .await
    .unwrap();
    assert_eq!(session.status, "active");

    let escalated = SafeWalkRepo::escalate(&pool, session.id, Utc::now())
        .await
        .unwrap()
        .expect("first escalation should win");
    assert_eq!(escalated.status, "emergency_triggered");

    // Every further transition loses to the guard.
    assert!(SafeWalkRepo::escalate(&pool, session.id, Utc::now())
        .await
        .unwrap()
        .is_none());
    assert!(!SafeWalkRepo::complete(&pool, session.id, Utc::now())
        .await
        .unwrap());
    assert!(!SafeWalkRepo::update_position(&pool, session.id, 1.0, 2.0)
        .await
        .unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn expired_scan_skips_terminal_sessions(pool: PgPool) {
    let user_a = seed_user(&pool, "ana").await;
    let user_b = seed_user(&pool, "bo").await;

    let past = Utc::now() - chrono::Duration::minutes(5);
    let expired = SafeWalkRepo::create(
        &pool,
        &CreateSafeWalkSession {
            user_id: user_a,
            end_time: past,
            start_latitude: None,
            start_longitude: None,
        },
    )
    .await
    .unwrap();

    let completed = SafeWalkRepo::create(
        &pool,
        &CreateSafeWalkSession {
            user_id: user_b,
            end_time: past,
            start_latitude: None,
            start_longitude: None,
        },
    )
    .await
    .unwrap();
    SafeWalkRepo::complete(&pool, completed.id, Utc::now())
        .await
        .unwrap();

    let found = SafeWalkRepo::find_expired_active(&pool, Utc::now())
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, expired.id);
}
