use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    middleware, Router,
};
use serde_json::Value;
use sqlx::{Pool, Postgres};
use tokio::sync::Mutex;
use tower::ServiceExt;
use uuid::Uuid;

/// Global mutex ensuring tests run sequentially against the shared database.
/// Each test acquires this lock before truncating and seeding, preventing
/// concurrent tests from interfering with each other's data.
static TEST_MUTEX: std::sync::LazyLock<Mutex<()>> = std::sync::LazyLock::new(|| Mutex::new(()));

pub const OWNER_EMAIL: &str = "mediator@example.com";
pub const OTHER_EMAIL: &str = "other@example.com";

/// Build a test router backed by a real Postgres pool.
/// Acquires a global lock, truncates all tables, and sets a JWT secret.
/// The returned `MutexGuard` must be held for the duration of the test to
/// prevent concurrent tests from truncating data.
pub async fn test_app() -> (Router, Pool<Postgres>, tokio::sync::MutexGuard<'static, ()>) {
    // Acquire the global test lock, held until the test completes
    let guard = TEST_MUTEX.lock().await;

    let _ = dotenvy::dotenv();

    if std::env::var("JWT_SECRET").is_err() {
        std::env::set_var("JWT_SECRET", "test-secret");
    }

    let database_url = std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("TEST_DATABASE_URL or DATABASE_URL must be set for tests");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    sqlx::query("TRUNCATE users, login_tokens, counties, clients, invoices, sessions, messages CASCADE")
        .execute(&pool)
        .await
        .expect("Failed to truncate");

    // Include the permissive auth middleware so AuthRequired extractors work
    // when a JWT Bearer token is present; unauthenticated requests still pass
    // through and get their 401 from the extractor.
    let state = server::db::AppState { pool: pool.clone() };
    let router = server::rest::api_router()
        .layer(middleware::from_fn(
            server::auth::middleware::auth_middleware,
        ))
        .with_state(state);

    (router, pool, guard)
}

/// Insert an account directly and return its ID.
pub async fn seed_user(pool: &Pool<Postgres>, email: &str) -> Uuid {
    sqlx::query_scalar("INSERT INTO users (email) VALUES ($1) RETURNING id")
        .bind(email)
        .fetch_one(pool)
        .await
        .expect("Failed to seed user")
}

/// Issue a bearer token for a seeded account.
pub fn bearer_for(user_id: Uuid, email: &str) -> String {
    server::auth::jwt::create_access_token(user_id, email).expect("Failed to create test token")
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let (status, _headers, bytes) = send_raw(app, req).await;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn send_raw(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = app.clone().oneshot(req).await.expect("Request failed");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body")
        .to_vec();
    (status, headers, bytes)
}

fn builder(method: &str, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header("authorization", format!("Bearer {token}"));
    }
    req
}

pub async fn get_json(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let req = builder("GET", uri, token).body(Body::empty()).unwrap();
    send(app, req).await
}

/// GET returning the raw body and headers, for artifact downloads.
pub async fn get_raw(
    app: &Router,
    uri: &str,
    token: Option<&str>,
) -> (StatusCode, HeaderMap, Vec<u8>) {
    let req = builder("GET", uri, token).body(Body::empty()).unwrap();
    send_raw(app, req).await
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    body: &str,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let req = builder("POST", uri, token)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

pub async fn put_json(
    app: &Router,
    uri: &str,
    body: &str,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let req = builder("PUT", uri, token)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

pub async fn delete_req(app: &Router, uri: &str, token: Option<&str>) -> StatusCode {
    let req = builder("DELETE", uri, token).body(Body::empty()).unwrap();
    let (status, _) = send(app, req).await;
    status
}

/// Create a county through the API and return its ID.
pub async fn create_county(app: &Router, token: &str, name: &str, format: Option<&str>) -> Uuid {
    let body = match format {
        Some(f) => serde_json::json!({ "name": name, "report_format": f }),
        None => serde_json::json!({ "name": name }),
    };
    let (status, json) = post_json(app, "/api/counties", &body.to_string(), Some(token)).await;
    assert_eq!(status, StatusCode::CREATED, "county create failed: {json}");
    json["id"].as_str().unwrap().parse().unwrap()
}

/// Create an invoice through the API and return its ID.
#[allow(clippy::too_many_arguments)]
pub async fn create_invoice(
    app: &Router,
    token: &str,
    county_id: Option<Uuid>,
    case_number: &str,
    matter: &str,
    contact: &str,
    hours: f64,
    rate: f64,
) -> Uuid {
    let body = serde_json::json!({
        "county_id": county_id,
        "case_number": case_number,
        "matter": matter,
        "contact": contact,
        "hours": hours,
        "rate": rate,
    });
    let (status, json) = post_json(app, "/api/invoices", &body.to_string(), Some(token)).await;
    assert_eq!(status, StatusCode::CREATED, "invoice create failed: {json}");
    json["id"].as_str().unwrap().parse().unwrap()
}

/// Move an invoice straight to Sent so it appears in exports.
pub async fn mark_sent(app: &Router, token: &str, invoice_id: Uuid) {
    let (status, json) = put_json(
        app,
        &format!("/api/invoices/{invoice_id}"),
        &serde_json::json!({ "status": "Sent" }).to_string(),
        Some(token),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "mark sent failed: {json}");
}
