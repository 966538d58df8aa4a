use axum::http::StatusCode;
use serde_json::json;

use crate::common::{
    bearer_for, delete_req, get_json, post_json, put_json, seed_user, test_app, OTHER_EMAIL,
    OWNER_EMAIL,
};

#[tokio::test]
async fn client_crud_round_trip() {
    let (app, pool, _guard) = test_app().await;
    let owner = seed_user(&pool, OWNER_EMAIL).await;
    let token = bearer_for(owner, OWNER_EMAIL);

    let (status, created) = post_json(
        &app,
        "/api/clients",
        &json!({ "name": "Reed Alvarez", "email": "reed@example.com" }).to_string(),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap();

    let (status, fetched) = get_json(&app, &format!("/api/clients/{id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Reed Alvarez");

    let (status, updated) = put_json(
        &app,
        &format!("/api/clients/{id}"),
        &json!({ "phone": "555-0100" }).to_string(),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Reed Alvarez");
    assert_eq!(updated["phone"], "555-0100");

    let status = delete_req(&app, &format!("/api/clients/{id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = get_json(&app, &format!("/api/clients/{id}"), Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_name_is_rejected() {
    let (app, pool, _guard) = test_app().await;
    let owner = seed_user(&pool, OWNER_EMAIL).await;
    let token = bearer_for(owner, OWNER_EMAIL);

    let (status, _) = post_json(
        &app,
        "/api/clients",
        &json!({ "name": "   " }).to_string(),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn clients_are_scoped_to_owner() {
    let (app, pool, _guard) = test_app().await;
    let owner = seed_user(&pool, OWNER_EMAIL).await;
    let other = seed_user(&pool, OTHER_EMAIL).await;
    let owner_token = bearer_for(owner, OWNER_EMAIL);
    let other_token = bearer_for(other, OTHER_EMAIL);

    let (_, created) = post_json(
        &app,
        "/api/clients",
        &json!({ "name": "Reed Alvarez" }).to_string(),
        Some(&owner_token),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, _) = get_json(&app, &format!("/api/clients/{id}"), Some(&other_token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
