//! Test-time log output.
//!
//! The library only emits `tracing` events; it never installs a subscriber on
//! its own. Tests that want to see dispatch decisions call
//! [`init_test_logging`] and set `RUST_LOG`, e.g.
//! `RUST_LOG=request_matcher=debug cargo test`.

use tracing_subscriber::EnvFilter;

/// Directive used when `RUST_LOG` is not set.
pub const DEFAULT_DIRECTIVE: &str = "warn";

/// Install a `fmt` subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
