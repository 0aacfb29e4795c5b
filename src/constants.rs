//! Global constants used throughout the harness.
//!
//! Exit codes, fixed directory names, and environment-variable names are
//! defined centrally so the values the external-tool contract depends on
//! are discoverable in one place.

/// Exit code the external tool returns on success.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code the external tool returns on a generic error.
pub const EXIT_ERROR: i32 = 1;

/// Fixed site-subdirectory names used during provisioning.
///
/// A setup requesting N sites uses the first N entries, in order. The first
/// entry doubles as the `--uri` handed to `archive-dump`, so the table order
/// is part of the cache-archive contract.
pub const SITE_SUBDIRS: [&str; 7] = ["dev", "stage", "prod", "retired", "elderly", "dead", "dust"];

/// Name of the sandbox directory created under the temp root.
pub const SANDBOX_DIR_NAME: &str = "sitectl-sandbox";

/// Name of the persistent cache directory created under the temp root when
/// no explicit cache prefix is configured.
pub const CACHE_DIR_NAME: &str = "sitectl-cache";

/// Subdirectory of the cache prefix that holds environment archives.
pub const ENVIRONMENTS_SUBDIR: &str = "environments";

/// Prefix prepended to a site subdirectory name to form its database name.
pub const DB_NAME_PREFIX: &str = "sbx";

/// Environment variable naming the database URL used for provisioned sites.
pub const ENV_DB_URL: &str = "SITECTL_TEST_DB_URL";

/// Environment variable overriding the path to the external tool executable.
pub const ENV_TOOL_BIN: &str = "SITECTL_TEST_BIN";

/// Environment variable overriding the temp root the sandbox lives under.
pub const ENV_TMP: &str = "SITECTL_TEST_TMP";

/// Environment variable overriding the persistent cache prefix.
pub const ENV_CACHE_PREFIX: &str = "SITECTL_TEST_CACHE_PREFIX";

/// Database URL used when [`ENV_DB_URL`] is unset.
pub const DEFAULT_DB_URL: &str = "mysql://root:@127.0.0.1";

/// Name of the external tool executable discovered on the search path when
/// [`ENV_TOOL_BIN`] is unset.
pub const TOOL_NAME: &str = "sitectl";
