//! Complete test environment for the harness's own integration tests.

#![cfg(unix)]

use std::path::Path;

use anyhow::Result;
use tempfile::TempDir;

use super::fixtures::FakeTool;
use super::init_test_logging;
use crate::config::HarnessConfig;
use crate::harness::Harness;

/// A fake tool plus a matching configuration inside an owned temp tree.
///
/// The temp directory lives as long as the environment, so the sandbox and
/// the cache prefix stay valid for the duration of a test.
pub struct TestEnvironment {
    temp_dir: TempDir,
    tool: FakeTool,
    config: HarnessConfig,
}

impl TestEnvironment {
    /// Creates a fresh environment with a recording fake tool.
    pub fn new() -> Result<Self> {
        init_test_logging();
        let temp_dir = TempDir::new()?;
        let tool = FakeTool::install(temp_dir.path())?;
        let config = tool.config(temp_dir.path());
        Ok(Self {
            temp_dir,
            tool,
            config,
        })
    }

    /// The recording fake tool.
    #[must_use]
    pub fn tool(&self) -> &FakeTool {
        &self.tool
    }

    /// The configuration pointing at the fake tool.
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Root of the owned temp tree.
    #[must_use]
    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// A fresh harness: new sandbox, same cache prefix and fake tool.
    pub fn harness(&self) -> Result<Harness> {
        Harness::with_config(self.config.clone())
    }
}
