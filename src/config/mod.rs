//! Harness configuration.
//!
//! Everything the original environment handed out through global state —
//! database URL, tool location, temp root, cache prefix, verbosity — is read
//! once into an explicit [`HarnessConfig`] value and passed into each
//! component. Working-directory and `HOME` changes are likewise scoped to
//! individual subprocess invocations (see [`crate::exec`]) instead of
//! mutating the test process.

use std::path::PathBuf;

use anyhow::Result;

use crate::constants::{
    CACHE_DIR_NAME, DB_NAME_PREFIX, DEFAULT_DB_URL, ENV_CACHE_PREFIX, ENV_DB_URL, ENV_TMP,
    ENV_TOOL_BIN, SANDBOX_DIR_NAME, TOOL_NAME,
};
use crate::core::HarnessError;
use crate::logger::LogLevel;
use crate::utils::platform::find_on_path;

/// Immutable configuration for one harness instance.
///
/// Constructed from the environment with [`HarnessConfig::from_env`], or
/// assembled directly in tests that substitute a fake tool and temp roots.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Base database URL; per-site databases are appended to it.
    pub db_url: String,
    /// Path to the external tool executable.
    pub tool: PathBuf,
    /// Temp root the sandbox directory is created under.
    pub tmp_root: PathBuf,
    /// Persistent cache prefix shared across test classes and runs.
    pub cache_prefix: PathBuf,
    /// Verbosity level derived from the invocation flags.
    pub log_level: LogLevel,
}

impl HarnessConfig {
    /// Reads the configuration from the process environment.
    ///
    /// | Variable | Meaning | Default |
    /// |---|---|---|
    /// | `SITECTL_TEST_DB_URL` | database URL | `mysql://root:@127.0.0.1` |
    /// | `SITECTL_TEST_BIN` | tool executable | discovered on PATH |
    /// | `SITECTL_TEST_TMP` | temp root | the system temp directory |
    /// | `SITECTL_TEST_CACHE_PREFIX` | cache prefix | `<tmp>/sitectl-cache` |
    ///
    /// Path values undergo tilde and `$VAR` expansion. Fails when the tool
    /// is neither configured nor present on the search path.
    pub fn from_env() -> Result<Self> {
        let db_url = std::env::var(ENV_DB_URL).unwrap_or_else(|_| DEFAULT_DB_URL.to_string());

        let tool = match std::env::var(ENV_TOOL_BIN) {
            Ok(raw) => PathBuf::from(expand(&raw)?),
            Err(_) => find_on_path(TOOL_NAME).ok_or_else(|| HarnessError::ToolNotFound {
                name: TOOL_NAME.to_string(),
                env_var: ENV_TOOL_BIN.to_string(),
            })?,
        };

        let tmp_root = match std::env::var(ENV_TMP) {
            Ok(raw) => PathBuf::from(expand(&raw)?),
            Err(_) => std::env::temp_dir(),
        };

        let cache_prefix = match std::env::var(ENV_CACHE_PREFIX) {
            Ok(raw) => PathBuf::from(expand(&raw)?),
            Err(_) => tmp_root.join(CACHE_DIR_NAME),
        };

        Ok(Self {
            db_url,
            tool,
            tmp_root,
            cache_prefix,
            log_level: LogLevel::from_invocation(),
        })
    }

    /// The sandbox root for this configuration.
    #[must_use]
    pub fn sandbox_root(&self) -> PathBuf {
        self.tmp_root.join(SANDBOX_DIR_NAME)
    }

    /// The web root all sites are provisioned under.
    #[must_use]
    pub fn webroot(&self) -> PathBuf {
        self.sandbox_root().join("web")
    }

    /// A subdirectory of the persistent cache prefix.
    ///
    /// The cache lives outside the sandbox so it survives class teardown;
    /// it is never invalidated automatically (delete the directory to force
    /// re-provisioning).
    #[must_use]
    pub fn directory_cache(&self, subdir: &str) -> PathBuf {
        if subdir.is_empty() {
            self.cache_prefix.clone()
        } else {
            self.cache_prefix.join(subdir)
        }
    }

    /// The database URL for one provisioned site.
    #[must_use]
    pub fn site_db_url(&self, subdir: &str) -> String {
        format!("{}/{}_{}", self.db_url, DB_NAME_PREFIX, subdir)
    }
}

/// Expands `~` and environment variables in a configured path value.
fn expand(raw: &str) -> Result<String> {
    Ok(shellexpand::full(raw)
        .map_err(|e| HarnessError::ConfigError {
            message: format!("failed to expand configured path {raw}: {e}"),
        })?
        .into_owned())
}
