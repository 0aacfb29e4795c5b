//! Fixtures for exercising the harness without the real external tool.

#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::HarnessConfig;
use crate::logger::LogLevel;

/// A recording stand-in for the `sitectl` executable.
///
/// The fixture writes a small shell script that appends every invocation to
/// a log file and mimics the filesystem effects of the commands the
/// provisioning flow depends on: `download` creates the web root,
/// `site-install` creates the site directory, `archive-dump` creates the
/// archive file (so the next setup takes the cache-hit path), and
/// `archive-restore` recreates the destination.
///
/// Unix-only; the script runs through `sh`.
#[derive(Debug)]
pub struct FakeTool {
    bin: PathBuf,
    log: PathBuf,
}

const SCRIPT_TEMPLATE: &str = r#"#!/bin/sh
printf '%s\n' "$*" >> "@LOG@"
cmd=""; dest=""; root=""; subdir=""; rename="web"
for a in "$@"; do
  case "$a" in
    --destination=*) dest="${a#--destination=}" ;;
    --root=*) root="${a#--root=}" ;;
    --sites-subdir=*) subdir="${a#--sites-subdir=}" ;;
    --project-rename=*) rename="${a#--project-rename=}" ;;
    --*) ;;
    *) if [ -z "$cmd" ]; then cmd="$a"; fi ;;
  esac
done
case "$cmd" in
  download) mkdir -p "$dest/$rename/sites" ;;
  site-install) mkdir -p "$root/sites/$subdir" ;;
  archive-dump) mkdir -p "$(dirname "$dest")" && : > "$dest" ;;
  archive-restore) mkdir -p "$dest" ;;
esac
exit 0
"#;

impl FakeTool {
    /// Installs the fake executable and its invocation log under `dir`.
    pub fn install(dir: &Path) -> Result<Self> {
        use std::os::unix::fs::PermissionsExt;

        let bin = dir.join("sitectl");
        let log = dir.join("invocations.log");
        fs::write(&log, "")?;

        let script = SCRIPT_TEMPLATE.replace("@LOG@", &log.display().to_string());
        fs::write(&bin, script)
            .with_context(|| format!("failed to write fake tool at {}", bin.display()))?;
        fs::set_permissions(&bin, fs::Permissions::from_mode(0o755))?;

        Ok(Self { bin, log })
    }

    /// Path of the fake executable.
    #[must_use]
    pub fn bin(&self) -> &Path {
        &self.bin
    }

    /// Every invocation recorded so far, one joined argument line each.
    pub fn invocations(&self) -> Result<Vec<String>> {
        Ok(fs::read_to_string(&self.log)?.lines().map(str::to_string).collect())
    }

    /// Number of recorded invocations whose leading token is `command`.
    pub fn count_of(&self, command: &str) -> Result<usize> {
        Ok(self
            .invocations()?
            .iter()
            .filter(|line| line.split_whitespace().next() == Some(command))
            .count())
    }

    /// A harness configuration pointing at this fake tool, sandboxed under
    /// `tmp_root`.
    #[must_use]
    pub fn config(&self, tmp_root: &Path) -> HarnessConfig {
        HarnessConfig {
            db_url: "mysql://root:@127.0.0.1".to_string(),
            tool: self.bin.clone(),
            tmp_root: tmp_root.to_path_buf(),
            cache_prefix: tmp_root.join("cache"),
            log_level: LogLevel::Unset,
        }
    }
}
