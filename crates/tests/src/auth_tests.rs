use axum::http::StatusCode;
use serde_json::json;

use crate::common::{get_json, post_json, seed_user, test_app, OWNER_EMAIL};

#[tokio::test]
async fn request_link_acknowledges_valid_address() {
    let (app, _pool, _guard) = test_app().await;

    let (status, body) = post_json(
        &app,
        "/api/auth/request-link",
        &json!({ "email": OWNER_EMAIL }).to_string(),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("sign-in link"));
}

#[tokio::test]
async fn request_link_rejects_malformed_address() {
    let (app, _pool, _guard) = test_app().await;

    let (status, _) = post_json(
        &app,
        "/api/auth/request-link",
        &json!({ "email": "not-an-email" }).to_string(),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn verify_creates_account_and_issues_token() {
    let (app, pool, _guard) = test_app().await;

    let token = server::auth::magic_link::create_login_token(&pool, OWNER_EMAIL)
        .await
        .unwrap();

    let (status, body) = get_json(&app, &format!("/api/auth/verify?token={token}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body["access_token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["email"], OWNER_EMAIL);

    // The issued token works against an authenticated route.
    let access = body["access_token"].as_str().unwrap().to_string();
    let (status, account) = get_json(&app, "/api/account", Some(&access)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(account["email"], OWNER_EMAIL);
}

#[tokio::test]
async fn login_link_is_single_use() {
    let (app, pool, _guard) = test_app().await;

    let token = server::auth::magic_link::create_login_token(&pool, OWNER_EMAIL)
        .await
        .unwrap();

    let (first, _) = get_json(&app, &format!("/api/auth/verify?token={token}"), None).await;
    assert_eq!(first, StatusCode::OK);

    let (second, _) = get_json(&app, &format!("/api/auth/verify?token={token}"), None).await;
    assert_eq!(second, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_token_is_rejected() {
    let (app, _pool, _guard) = test_app().await;

    let (status, _) = get_json(&app, "/api/auth/verify?token=not-a-real-token", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn verify_clears_bounce_flag_on_returning_account() {
    let (app, pool, _guard) = test_app().await;

    seed_user(&pool, OWNER_EMAIL).await;
    sqlx::query("UPDATE users SET email_bounced = TRUE WHERE email = $1")
        .bind(OWNER_EMAIL)
        .execute(&pool)
        .await
        .unwrap();

    let token = server::auth::magic_link::create_login_token(&pool, OWNER_EMAIL)
        .await
        .unwrap();
    let (status, body) = get_json(&app, &format!("/api/auth/verify?token={token}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email_bounced"], false);
}
