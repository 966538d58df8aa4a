use axum::extract::State;
use axum::Json;
use serde::Serialize;
use sqlx::{Pool, Postgres};
use std::sync::OnceLock;
use std::time::Instant;

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Record the application start time. Call once during startup.
pub fn record_start_time() {
    START_TIME.get_or_init(Instant::now);
}

/// Health check response. Besides liveness it reports whether the two
/// things an export depends on are in place: the migrated schema and the
/// bundled PDF toolchain.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub db: String,
    /// Applied migration count, absent when the database is unreachable.
    pub migrations_applied: Option<i64>,
    pub pdf_fonts: usize,
    pub uptime_seconds: u64,
    pub version: String,
}

/// Health check handler.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(pool): State<Pool<Postgres>>) -> Json<HealthResponse> {
    // One round trip covers connectivity and schema state.
    let (db_status, migrations_applied) = match sqlx::query_scalar::<_, i64>(
        "SELECT count(*) FROM _sqlx_migrations WHERE success",
    )
    .fetch_one(&pool)
    .await
    {
        Ok(count) => ("connected".to_string(), Some(count)),
        Err(e) => (format!("error: {e}"), None),
    };

    let uptime = START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0);

    Json(HealthResponse {
        status: "ok".to_string(),
        db: db_status,
        migrations_applied,
        // Also warms the font cache ahead of the first PDF export.
        pdf_fonts: crate::typst::font_count(),
        uptime_seconds: uptime,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
