use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() {
    server::config::load_feature_flags();
    let flags = server::config::feature_flags();

    if flags.telemetry {
        server::telemetry::init_telemetry();
    }
    server::health::record_start_time();

    let pool = server::db::create_pool();
    server::db::run_migrations(&pool).await;

    // Background task: purge expired login tokens every 15 minutes.
    let cleanup_pool = pool.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(15 * 60));
        loop {
            interval.tick().await;
            let _ = sqlx::query(
                "DELETE FROM login_tokens WHERE expires_at < NOW() - INTERVAL '1 hour'",
            )
            .execute(&cleanup_pool)
            .await;
        }
    });

    let router = server::openapi::api_router(pool)
        .layer(axum::middleware::from_fn(
            server::auth::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http());

    let port: u16 = std::env::var("APP_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .expect("Failed to bind server port");

    tracing::info!(port = port, "Accordia server listening");

    axum::serve(listener, router)
        .await
        .expect("Server terminated unexpectedly");
}
