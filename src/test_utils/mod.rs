//! Test utilities for the harness's own test suite.
//!
//! Provides one-time tracing initialization, the [`FakeTool`] fixture — a
//! recording stand-in for the external tool, so command construction and
//! cache behavior are observable without a real installation — and a
//! [`TestEnvironment`] tying the fixture to a matching configuration inside
//! an owned temp tree.

pub mod environment;
pub mod fixtures;

#[cfg(unix)]
pub use environment::TestEnvironment;
#[cfg(unix)]
pub use fixtures::FakeTool;

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initializes the tracing subscriber for tests, once per process.
///
/// Respects `RUST_LOG`; does nothing when it is unset. Uses the test writer
/// so output interleaves correctly with the test runner.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}
