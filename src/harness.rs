//! The harness value test classes hold on to.
//!
//! [`Harness`] ties the components together: it owns the configuration, the
//! sandbox, the executor, the logger, and the metadata for any sites
//! provisioned through the environment cache. One harness corresponds to one
//! test class; constructing it prepares a pristine sandbox and dropping it
//! (or calling [`Harness::teardown`]) removes the sandbox again.

use std::collections::BTreeMap;

use anyhow::Result;

use crate::cache::{self, SiteSetup};
use crate::config::HarnessConfig;
use crate::exec::Executor;
use crate::logger::Logger;
use crate::sandbox::Sandbox;
use crate::site::SiteSpec;

/// Harness for one test class exercising the external tool.
///
/// # Examples
///
/// ```rust,no_run
/// use sitectl_harness::{Harness, SiteCommand, SiteSetup};
///
/// # fn example() -> anyhow::Result<()> {
/// let mut harness = Harness::new()?;
/// harness.setup_sites(&SiteSetup::new().sites(2).install(true))?;
///
/// SiteCommand::new("status").site("@dev").run(&mut harness)?;
/// for line in harness.output_lines() {
///     println!("{line}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Harness {
    config: HarnessConfig,
    logger: Logger,
    sandbox: Sandbox,
    executor: Executor,
    sites: BTreeMap<String, SiteSpec>,
}

impl Harness {
    /// Creates a harness configured from the environment.
    pub fn new() -> Result<Self> {
        Self::with_config(HarnessConfig::from_env()?)
    }

    /// Creates a harness from an explicit configuration.
    ///
    /// Sets up the sandbox tree and an executor whose working directory and
    /// environment (`HOME`, prefix variables) point into it.
    pub fn with_config(config: HarnessConfig) -> Result<Self> {
        let sandbox = Sandbox::create(&config)?;
        let executor = Executor::new(sandbox.root().to_path_buf(), sandbox.env_overrides());
        Ok(Self {
            logger: Logger::new(config.log_level),
            config,
            sandbox,
            executor,
            sites: BTreeMap::new(),
        })
    }

    /// The configuration this harness was built from.
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// The console logger, filtered at the configured level.
    #[must_use]
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// The sandbox this harness runs inside.
    #[must_use]
    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    /// Executes an already-assembled command line, expecting exit code
    /// `expected`; returns the exit code.
    ///
    /// Most callers go through [`SiteCommand::run`](crate::SiteCommand::run)
    /// instead; this entry point exists for running arbitrary helper
    /// commands inside the sandbox.
    pub fn execute(&mut self, command_line: &str, expected: i32) -> Result<i32> {
        self.logger.notice(&format!("Executing: {command_line}"));
        self.executor.execute(command_line, expected)
    }

    /// The last captured output as a single joined string.
    #[must_use]
    pub fn output(&self) -> String {
        self.executor.output()
    }

    /// The last captured output as ordered lines.
    #[must_use]
    pub fn output_lines(&self) -> &[String] {
        self.executor.output_lines()
    }

    /// Provisions (or restores from cache) the requested site environment.
    ///
    /// See [`SiteSetup`] for the parameters and the caching scheme. The
    /// resulting site metadata is retained and also returned.
    pub fn setup_sites(&mut self, setup: &SiteSetup) -> Result<&BTreeMap<String, SiteSpec>> {
        let sites = cache::setup_sites(self, setup)?;
        self.sites = sites;
        Ok(&self.sites)
    }

    /// Metadata for the sites provisioned by [`setup_sites`](Self::setup_sites).
    #[must_use]
    pub fn sites(&self) -> &BTreeMap<String, SiteSpec> {
        &self.sites
    }

    /// Tears the sandbox down, propagating removal failures.
    ///
    /// Dropping the harness removes the sandbox as well, but silently;
    /// explicit teardown is for tests that want the failure surfaced.
    pub fn teardown(self) -> Result<()> {
        self.sandbox.remove()
    }
}
