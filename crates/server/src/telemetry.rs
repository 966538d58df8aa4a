use tracing_subscriber::EnvFilter;

/// Initialize process-wide tracing output.
///
/// Reads `RUST_LOG` for filtering and defaults to `info`. Safe to call
/// multiple times; subsequent calls are no-ops.
pub fn init_telemetry() {
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
