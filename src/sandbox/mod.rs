//! Sandbox lifecycle management.
//!
//! Each test class works inside a disposable scratch tree under the
//! configured temp root. Setup guarantees the tree starts empty; teardown
//! removes it entirely. The persistent cache directory deliberately lives
//! outside the sandbox so provisioned environments survive across classes
//! and runs.
//!
//! The original environment made the sandbox ambient by changing the process
//! working directory and exporting `HOME` and prefix variables. Here the
//! sandbox only *describes* that environment; the
//! [`Executor`](crate::exec::Executor) applies it to each subprocess, so the
//! test process itself is never mutated.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::HarnessConfig;
use crate::core::HarnessError;

/// Directory name (under the sandbox and under `home/`) the external tool
/// reads its per-user configuration from.
const TOOL_DOT_DIR: &str = ".sitectl";

/// The per-test-class scratch tree.
///
/// Layout, relative to the sandbox root:
///
/// ```text
/// home/                    subprocess HOME
/// home/.sitectl/           the tool's per-user directory
/// etc/sitectl/             site alias definitions
/// share/sitectl/commands/  extra command files picked up by the tool
/// web/                     created by provisioning, not by setup
/// ```
#[derive(Debug)]
pub struct Sandbox {
    root: PathBuf,
    home: PathBuf,
    etc_dir: PathBuf,
    share_commands_dir: PathBuf,
}

impl Sandbox {
    /// Prepares a pristine sandbox for `config`.
    ///
    /// A leftover tree from an earlier (possibly crashed) run is deleted
    /// first, so the sandbox is always empty at the start of a test class.
    pub fn create(config: &HarnessConfig) -> Result<Self> {
        let root = config.sandbox_root();
        delete_recursive(&root)?;

        let home = root.join("home");
        let etc_dir = root.join("etc").join("sitectl");
        let share_commands_dir = root.join("share").join("sitectl").join("commands");

        for dir in [&home.join(TOOL_DOT_DIR), &etc_dir, &share_commands_dir] {
            fs::create_dir_all(dir)
                .map_err(|e| HarnessError::fs("create directory", dir.clone(), e))?;
        }

        Ok(Self {
            root,
            home,
            etc_dir,
            share_commands_dir,
        })
    }

    /// The sandbox root; subprocesses run with this as their working
    /// directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The `HOME` directory handed to subprocesses.
    #[must_use]
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Where site alias definition files are written.
    #[must_use]
    pub fn etc_dir(&self) -> &Path {
        &self.etc_dir
    }

    /// The extra-commands directory advertised to the tool.
    #[must_use]
    pub fn share_commands_dir(&self) -> &Path {
        &self.share_commands_dir
    }

    /// Environment overrides applied to every subprocess run in this
    /// sandbox.
    #[must_use]
    pub fn env_overrides(&self) -> Vec<(String, String)> {
        let root = self.root.display().to_string();
        vec![
            ("HOME".to_string(), self.home.display().to_string()),
            ("SITECTL_ETC_PREFIX".to_string(), root.clone()),
            ("SITECTL_SHARE_PREFIX".to_string(), root),
        ]
    }

    /// Removes the sandbox tree. Safe to call when it is already gone.
    pub fn remove(&self) -> Result<()> {
        delete_recursive(&self.root)
    }
}

impl Drop for Sandbox {
    fn drop(&mut self) {
        // Teardown errors surface through explicit remove(); on drop the
        // best we can do is try.
        let _ = delete_recursive(&self.root);
    }
}

/// Recursively deletes `path`.
///
/// - A non-existent path succeeds trivially.
/// - A file (or symlink) is made writable, then removed.
/// - A directory has each entry deleted recursively (the directory iterator
///   already excludes the self/parent markers), then is removed itself.
///
/// The first failing removal aborts the recursion and propagates upward.
pub fn delete_recursive(path: &Path) -> Result<()> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(HarnessError::fs("stat", path, e).into()),
    };

    if !meta.is_dir() {
        make_writable(path);
        fs::remove_file(path).map_err(|e| HarnessError::fs("remove file", path, e))?;
        return Ok(());
    }

    let entries =
        fs::read_dir(path).map_err(|e| HarnessError::fs("read directory", path, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| HarnessError::fs("read directory entry", path, e))?;
        delete_recursive(&entry.path())?;
    }
    fs::remove_dir(path).map_err(|e| HarnessError::fs("remove directory", path, e).into())
}

/// Clears write protection; failures are ignored and left for the following
/// operation to report.
pub(crate) fn make_writable(path: &Path) {
    let Ok(meta) = fs::symlink_metadata(path) else {
        return;
    };
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = meta.permissions();
        perms.set_mode(0o777);
        let _ = fs::set_permissions(path, perms);
    }
    #[cfg(not(unix))]
    {
        let mut perms = meta.permissions();
        if perms.readonly() {
            perms.set_readonly(false);
            let _ = fs::set_permissions(path, perms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::LogLevel;

    fn config_in(tmp: &Path) -> HarnessConfig {
        HarnessConfig {
            db_url: "mysql://root:@127.0.0.1".to_string(),
            tool: PathBuf::from("sitectl"),
            tmp_root: tmp.to_path_buf(),
            cache_prefix: tmp.join("cache"),
            log_level: LogLevel::Unset,
        }
    }

    #[test]
    fn create_builds_the_expected_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let sandbox = Sandbox::create(&config_in(tmp.path())).unwrap();

        assert!(sandbox.root().exists());
        assert!(sandbox.home().join(TOOL_DOT_DIR).is_dir());
        assert!(sandbox.etc_dir().is_dir());
        assert!(sandbox.share_commands_dir().is_dir());
    }

    #[test]
    fn create_wipes_a_stale_sandbox() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());

        let stale = config.sandbox_root().join("leftover.txt");
        fs::create_dir_all(config.sandbox_root()).unwrap();
        fs::write(&stale, "stale").unwrap();

        let sandbox = Sandbox::create(&config).unwrap();
        assert!(!stale.exists());
        assert!(sandbox.root().exists());
    }

    #[test]
    fn remove_deletes_the_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let sandbox = Sandbox::create(&config_in(tmp.path())).unwrap();
        let root = sandbox.root().to_path_buf();

        sandbox.remove().unwrap();
        assert!(!root.exists());
    }

    #[test]
    fn env_overrides_point_into_the_sandbox() {
        let tmp = tempfile::tempdir().unwrap();
        let sandbox = Sandbox::create(&config_in(tmp.path())).unwrap();
        let env = sandbox.env_overrides();

        let home = env.iter().find(|(k, _)| k == "HOME").unwrap();
        assert!(home.1.starts_with(&sandbox.root().display().to_string()));
        assert!(env.iter().any(|(k, _)| k == "SITECTL_ETC_PREFIX"));
        assert!(env.iter().any(|(k, _)| k == "SITECTL_SHARE_PREFIX"));
    }

    #[test]
    fn delete_recursive_on_missing_path_succeeds() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(delete_recursive(&tmp.path().join("does-not-exist")).is_ok());
    }

    #[test]
    fn delete_recursive_removes_nested_trees() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("tree");
        fs::create_dir_all(root.join("a/b/c")).unwrap();
        fs::write(root.join("top.txt"), "x").unwrap();
        fs::write(root.join("a/b/mid.txt"), "y").unwrap();
        fs::write(root.join("a/b/c/leaf.txt"), "z").unwrap();

        delete_recursive(&root).unwrap();
        assert!(!root.exists());
    }

    #[cfg(unix)]
    #[test]
    fn delete_recursive_handles_readonly_files() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("tree");
        fs::create_dir_all(&root).unwrap();
        let file = root.join("readonly.txt");
        fs::write(&file, "x").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o444)).unwrap();

        delete_recursive(&root).unwrap();
        assert!(!root.exists());
    }

    #[test]
    fn delete_recursive_on_a_single_file_removes_it() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("single.txt");
        fs::write(&file, "x").unwrap();

        delete_recursive(&file).unwrap();
        assert!(!file.exists());
    }
}
