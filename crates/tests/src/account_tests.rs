use axum::http::StatusCode;
use serde_json::json;

use crate::common::{bearer_for, get_json, put_json, seed_user, test_app, OWNER_EMAIL};

#[tokio::test]
async fn account_requires_authentication() {
    let (app, _pool, _guard) = test_app().await;

    let (status, _) = get_json(&app, "/api/account", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn get_account_returns_caller() {
    let (app, pool, _guard) = test_app().await;
    let owner = seed_user(&pool, OWNER_EMAIL).await;
    let token = bearer_for(owner, OWNER_EMAIL);

    let (status, body) = get_json(&app, "/api/account", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], OWNER_EMAIL);
    assert_eq!(body["id"], owner.to_string());
}

#[tokio::test]
async fn settings_update_is_partial() {
    let (app, pool, _guard) = test_app().await;
    let owner = seed_user(&pool, OWNER_EMAIL).await;
    let token = bearer_for(owner, OWNER_EMAIL);

    let (status, body) = put_json(
        &app,
        "/api/account/settings",
        &json!({ "display_name": "R. Alvarez", "default_rate": 250.0 }).to_string(),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display_name"], "R. Alvarez");
    assert_eq!(body["default_rate"], 250.0);

    // A later update that omits display_name leaves it in place.
    let (status, body) = put_json(
        &app,
        "/api/account/settings",
        &json!({ "timezone": "America/Los_Angeles" }).to_string(),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display_name"], "R. Alvarez");
    assert_eq!(body["timezone"], "America/Los_Angeles");
}

#[tokio::test]
async fn negative_default_rate_is_rejected() {
    let (app, pool, _guard) = test_app().await;
    let owner = seed_user(&pool, OWNER_EMAIL).await;
    let token = bearer_for(owner, OWNER_EMAIL);

    let (status, _) = put_json(
        &app,
        "/api/account/settings",
        &json!({ "default_rate": -5.0 }).to_string(),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
