//! Shared tracing/logging setup.

use tracing_subscriber::EnvFilter;

/// Initialize process-wide tracing with the default `info` filter,
/// overridable via `RUST_LOG`.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    init_with_filter("info");
}

/// [`init`] with an explicit fallback filter directive.
pub fn init_with_filter(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // JSON logs with timestamps, so availability changes and cache writes
    // land in log pipelines as structured events.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
