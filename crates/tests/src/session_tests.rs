use axum::http::StatusCode;
use serde_json::json;

use crate::common::{
    bearer_for, delete_req, get_json, post_json, put_json, seed_user, test_app, OWNER_EMAIL,
};

#[tokio::test]
async fn session_crud_round_trip() {
    let (app, pool, _guard) = test_app().await;
    let owner = seed_user(&pool, OWNER_EMAIL).await;
    let token = bearer_for(owner, OWNER_EMAIL);

    let (status, created) = post_json(
        &app,
        "/api/sessions",
        &json!({
            "title": "Smith v. Turner mediation",
            "starts_at": "2026-09-01T17:00:00Z",
            "ends_at": "2026-09-01T19:00:00Z",
            "location": "Suite 410"
        })
        .to_string(),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap();

    let (status, updated) = put_json(
        &app,
        &format!("/api/sessions/{id}"),
        &json!({ "notes": "Bring the draft agreement" }).to_string(),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["notes"], "Bring the draft agreement");
    assert_eq!(updated["title"], "Smith v. Turner mediation");

    let status = delete_req(&app, &format!("/api/sessions/{id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn session_must_end_after_it_starts() {
    let (app, pool, _guard) = test_app().await;
    let owner = seed_user(&pool, OWNER_EMAIL).await;
    let token = bearer_for(owner, OWNER_EMAIL);

    let (status, _) = post_json(
        &app,
        "/api/sessions",
        &json!({
            "title": "Backwards session",
            "starts_at": "2026-09-01T17:00:00Z",
            "ends_at": "2026-09-01T16:00:00Z"
        })
        .to_string(),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sessions_list_soonest_first() {
    let (app, pool, _guard) = test_app().await;
    let owner = seed_user(&pool, OWNER_EMAIL).await;
    let token = bearer_for(owner, OWNER_EMAIL);

    for (title, starts) in [
        ("Later", "2026-10-01T17:00:00Z"),
        ("Sooner", "2026-09-01T17:00:00Z"),
    ] {
        let (status, _) = post_json(
            &app,
            "/api/sessions",
            &json!({ "title": title, "starts_at": starts }).to_string(),
            Some(&token),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = get_json(&app, "/api/sessions", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Sooner", "Later"]);
}

#[tokio::test]
async fn unknown_client_reference_is_rejected() {
    let (app, pool, _guard) = test_app().await;
    let owner = seed_user(&pool, OWNER_EMAIL).await;
    let token = bearer_for(owner, OWNER_EMAIL);

    let (status, _) = post_json(
        &app,
        "/api/sessions",
        &json!({
            "client_id": uuid::Uuid::new_v4(),
            "title": "Orphan session",
            "starts_at": "2026-09-01T17:00:00Z"
        })
        .to_string(),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
