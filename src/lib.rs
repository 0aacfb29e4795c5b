//! sitectl-harness — integration-test harness for the `sitectl` CLI
//!
//! A library for exercising the external `sitectl` site-management tool
//! from integration tests: it assembles safely escaped command lines, runs
//! them through the platform shell, asserts on exit codes, captures output,
//! and manages the sandboxed filesystem environment each test class works
//! in. Expensive site provisioning is cached as archives keyed by the
//! provisioning parameters, so repeated suites skip the download/install
//! path.
//!
//! # Architecture Overview
//!
//! One [`Harness`] per test class. Constructing it prepares a pristine
//! sandbox under the configured temp root; dropping it (or calling
//! [`Harness::teardown`]) removes the sandbox. The persistent cache
//! directory lives outside the sandbox and is shared across classes and
//! runs.
//!
//! Control flow: sandbox setup → [`Harness::setup_sites`] consults the
//! environment cache (restore on hit, provision + archive on miss) → tests
//! run arbitrary tool commands through [`SiteCommand`] → sandbox teardown.
//!
//! # Core Modules
//!
//! - [`config`] - explicit configuration read once from the environment
//! - [`exec`] - argument escaping, command building, subprocess execution
//! - [`sandbox`] - scratch-tree lifecycle and recursive deletion
//! - [`cache`] - environment provisioning with archive caching
//! - [`site`] - provisioned-site metadata and alias definition files
//! - [`logger`] - verbosity-gated console diagnostics
//! - [`harness`] - the per-test-class value tying it together
//!
//! # Example
//!
//! ```rust,no_run
//! use sitectl_harness::{Harness, SiteCommand, SiteSetup};
//!
//! # fn example() -> anyhow::Result<()> {
//! let mut harness = Harness::new()?;
//!
//! // Restores from the archive cache when this tuple was provisioned
//! // before; downloads and installs otherwise.
//! harness.setup_sites(&SiteSetup::new().sites(2).install(true))?;
//!
//! SiteCommand::new("status").site("@dev").run(&mut harness)?;
//! assert!(harness.output().contains("Connected"));
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `SITECTL_TEST_DB_URL` | database URL for provisioned sites | `mysql://root:@127.0.0.1` |
//! | `SITECTL_TEST_BIN` | tool executable | discovered on PATH |
//! | `SITECTL_TEST_TMP` | temp root for the sandbox | system temp directory |
//! | `SITECTL_TEST_CACHE_PREFIX` | persistent cache prefix | `<tmp>/sitectl-cache` |
//!
//! Run the suite with `--verbose` or `--debug` to raise the harness's
//! diagnostic level; the same flag is forwarded to every tool invocation.

pub mod cache;
pub mod config;
pub mod constants;
pub mod core;
pub mod exec;
pub mod harness;
pub mod logger;
pub mod sandbox;
pub mod site;
pub mod utils;

// Available to this crate's tests and, via the feature, to dependents'.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use cache::SiteSetup;
pub use config::HarnessConfig;
pub use core::HarnessError;
pub use exec::{CommandOption, Executor, SiteCommand, escape};
pub use harness::Harness;
pub use logger::{LogLevel, LogType, Logger};
pub use sandbox::{Sandbox, delete_recursive};
pub use site::SiteSpec;
