//! Environment provisioning with archive caching.
//!
//! Downloading and installing the software under test dominates suite run
//! time, so provisioned environments are archived and reused. The archive
//! key is derived from the full parameter tuple — site count, install flag,
//! version, install profile — and lives under
//! `<cache prefix>/environments/`, outside the sandbox, so it survives
//! class teardown and whole runs.
//!
//! A present archive is restored through the external tool's
//! `archive-restore` command; a missing one triggers the expensive path:
//! download (once per web root), per-site install or scaffold, then
//! `archive-dump` to populate the cache for the next run.
//!
//! Entries are never invalidated automatically. Delete the cache directory
//! to force re-provisioning.

use std::collections::BTreeMap;
use std::fs;

use anyhow::{Context, Result};

use crate::constants::{ENVIRONMENTS_SUBDIR, SITE_SUBDIRS};
use crate::exec::SiteCommand;
use crate::harness::Harness;
use crate::sandbox::make_writable;
use crate::site::SiteSpec;

/// Parameters for one site-environment setup.
///
/// # Examples
///
/// ```rust,no_run
/// use sitectl_harness::{Harness, SiteSetup};
///
/// # fn example(harness: &mut Harness) -> anyhow::Result<()> {
/// // Two fully installed version-7 sites using the default profile.
/// harness.setup_sites(&SiteSetup::new().sites(2).install(true))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SiteSetup {
    /// Number of sites to provision (capped at the fixed subdirectory
    /// table length).
    pub num_sites: usize,
    /// Whether to run the installer or just scaffold the site directory.
    pub install: bool,
    /// Version of the software under test to download.
    pub version: String,
    /// Install profile; `None` selects a version-appropriate default.
    pub profile: Option<String>,
}

impl Default for SiteSetup {
    fn default() -> Self {
        Self {
            num_sites: 1,
            install: false,
            version: "7".to_string(),
            profile: None,
        }
    }
}

impl SiteSetup {
    /// One uninstalled version-7 site.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of sites.
    #[must_use]
    pub const fn sites(mut self, num_sites: usize) -> Self {
        self.num_sites = num_sites;
        self
    }

    /// Sets whether sites are installed.
    #[must_use]
    pub const fn install(mut self, install: bool) -> Self {
        self.install = install;
        self
    }

    /// Sets the version to download.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets an explicit install profile.
    #[must_use]
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// The install profile, defaulting by version: releases from major 7 on
    /// ship a stripped-down `testing` profile, older ones only `default`.
    #[must_use]
    pub fn profile_or_default(&self) -> String {
        self.profile.clone().unwrap_or_else(|| {
            let major = self.version.chars().next().and_then(|c| c.to_digit(10));
            if major.is_some_and(|d| d >= 7) {
                "testing".to_string()
            } else {
                "default".to_string()
            }
        })
    }

    /// Deterministic archive file name for this parameter tuple.
    #[must_use]
    pub fn archive_name(&self) -> String {
        format!(
            "{}-{}-{}-{}.tar.gz",
            self.num_sites,
            if self.install { "install" } else { "noinstall" },
            self.version,
            self.profile_or_default()
        )
    }
}

/// Provisions or restores the environment described by `setup` and returns
/// the per-site metadata.
pub(crate) fn setup_sites(
    harness: &mut Harness,
    setup: &SiteSetup,
) -> Result<BTreeMap<String, SiteSpec>> {
    anyhow::ensure!(setup.num_sites >= 1, "at least one site is required");

    let config = harness.config().clone();
    let logger = *harness.logger();
    let profile = setup.profile_or_default();
    let subdirs: Vec<&str> = SITE_SUBDIRS.iter().take(setup.num_sites).copied().collect();
    let root = config.webroot();
    let source = config.directory_cache(ENVIRONMENTS_SUBDIR).join(setup.archive_name());

    if source.exists() {
        logger.verbose(&format!("Cache HIT. Environment: {}", source.display()));
        SiteCommand::new("archive-restore")
            .arg(source.display().to_string())
            .option("destination", root.display().to_string())
            .flag("overwrite")
            .run(harness)?;
    } else {
        logger.verbose(&format!("Cache MISS. Environment: {}", source.display()));
        for subdir in &subdirs {
            fetch_install_site(harness, subdir, setup.install, &setup.version, &profile)?;
        }
        SiteCommand::new("archive-dump")
            .arg("@sites")
            .option("destination", source.display().to_string())
            .option("root", root.display().to_string())
            .option("uri", subdirs[0])
            .flag("overwrite")
            .run(harness)?;
    }

    // Stash details about each site and make it addressable as @<name>.
    let mut sites = BTreeMap::new();
    for subdir in &subdirs {
        let spec = SiteSpec {
            name: (*subdir).to_string(),
            root: root.clone(),
            uri: (*subdir).to_string(),
            db_url: config.site_db_url(subdir),
        };
        spec.write_alias(harness.sandbox().etc_dir())?;
        sites.insert((*subdir).to_string(), spec);
    }
    Ok(sites)
}

/// Downloads the web root if absent, then installs or scaffolds one site.
fn fetch_install_site(
    harness: &mut Harness,
    subdir: &str,
    install: bool,
    version: &str,
    profile: &str,
) -> Result<()> {
    let config = harness.config().clone();
    let root = config.webroot();
    let site = root.join("sites").join(subdir);

    if !root.exists() {
        SiteCommand::new("download")
            .arg(format!("core-{version}"))
            .option("destination", config.sandbox_root().display().to_string())
            .option("project-rename", "web")
            .flag("yes")
            .flag("quiet")
            .flag("cache")
            .run(harness)?;
    }

    if install {
        SiteCommand::new("site-install")
            .arg(profile)
            .option("root", root.display().to_string())
            .option("db-url", config.site_db_url(subdir))
            .option("sites-subdir", subdir)
            .flag("yes")
            .flag("quiet")
            .run(harness)?;
        // The installer locks the site directory down; take write access
        // back so teardown can delete it.
        make_writable(&site);
    } else {
        fs::create_dir_all(&site)
            .with_context(|| format!("failed to scaffold site directory {}", site.display()))?;
        fs::write(site.join("settings.php"), "")
            .with_context(|| format!("failed to create settings file in {}", site.display()))?;
    }
    Ok(())
}
