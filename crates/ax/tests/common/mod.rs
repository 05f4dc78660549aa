//! Shared setup for the end-to-end tests.

/// Route `tracing` events to the test harness's captured output.
///
/// Filter with `RUST_LOG` (defaults to `debug`). Safe to call from every
/// test; only the first call installs the subscriber.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
