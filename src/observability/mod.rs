//! Logging setup
//!
//! Log output goes through `tracing`; the level filter comes from `RUST_LOG`
//! and defaults to `info`.

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init();
}
