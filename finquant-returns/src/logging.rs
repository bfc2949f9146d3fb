use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialise default non-JSON `finquant-returns` logging.
///
/// Filter directives are read from `RUST_LOG`, defaulting to `INFO`. Does nothing if a global
/// subscriber is already installed.
pub fn init_logging() {
    // Err only if a global subscriber is already installed, which is left in place
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Initialise default JSON `finquant-returns` logging.
///
/// Filter directives are read from `RUST_LOG`, defaulting to `INFO`. Does nothing if a global
/// subscriber is already installed.
pub fn init_json_logging() {
    // Err only if a global subscriber is already installed, which is left in place
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
        .try_init();
}
