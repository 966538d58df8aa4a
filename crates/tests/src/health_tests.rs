use axum::http::StatusCode;

use crate::common::{get_json, test_app};

#[tokio::test]
async fn health_reports_schema_and_pdf_readiness() {
    let (_, pool, _guard) = test_app().await;
    // /health lives on the outer router alongside the docs mount.
    let app = server::openapi::api_router(pool);

    let (status, body) = get_json(&app, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "connected");
    assert!(body["migrations_applied"].as_i64().unwrap() >= 1);
    assert!(body["pdf_fonts"].as_u64().unwrap() > 0);
    assert!(body["version"].is_string());
}
