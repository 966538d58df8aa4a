use axum::http::StatusCode;
use serde_json::json;

use crate::common::{
    bearer_for, delete_req, get_json, post_json, put_json, seed_user, test_app, OWNER_EMAIL,
};

#[tokio::test]
async fn messages_start_unread_and_can_be_marked_read() {
    let (app, pool, _guard) = test_app().await;
    let owner = seed_user(&pool, OWNER_EMAIL).await;
    let token = bearer_for(owner, OWNER_EMAIL);

    let (status, created) = post_json(
        &app,
        "/api/messages",
        &json!({ "subject": "Reminder", "body": "King report due Friday" }).to_string(),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["read"], false);
    let id = created["id"].as_str().unwrap();

    let (status, marked) = post_json(
        &app,
        &format!("/api/messages/{id}/read"),
        "",
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(marked["read"], true);
}

#[tokio::test]
async fn get_and_update_message() {
    let (app, pool, _guard) = test_app().await;
    let owner = seed_user(&pool, OWNER_EMAIL).await;
    let token = bearer_for(owner, OWNER_EMAIL);

    let (_, created) = post_json(
        &app,
        "/api/messages",
        &json!({ "subject": "Reminder", "body": "King report due Friday" }).to_string(),
        Some(&token),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, fetched) = get_json(&app, &format!("/api/messages/{id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["subject"], "Reminder");

    // Partial update leaves the untouched field alone.
    let (status, updated) = put_json(
        &app,
        &format!("/api/messages/{id}"),
        &json!({ "body": "Pierce report due Friday" }).to_string(),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["subject"], "Reminder");
    assert_eq!(updated["body"], "Pierce report due Friday");

    let (status, _) = get_json(
        &app,
        &format!("/api/messages/{}", uuid::Uuid::new_v4()),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_subject_is_rejected() {
    let (app, pool, _guard) = test_app().await;
    let owner = seed_user(&pool, OWNER_EMAIL).await;
    let token = bearer_for(owner, OWNER_EMAIL);

    let (status, _) = post_json(
        &app,
        "/api/messages",
        &json!({ "subject": "", "body": "b" }).to_string(),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_message() {
    let (app, pool, _guard) = test_app().await;
    let owner = seed_user(&pool, OWNER_EMAIL).await;
    let token = bearer_for(owner, OWNER_EMAIL);

    let (_, created) = post_json(
        &app,
        "/api/messages",
        &json!({ "subject": "s", "body": "b" }).to_string(),
        Some(&token),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let status = delete_req(&app, &format!("/api/messages/{id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = get_json(&app, "/api/messages", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}
