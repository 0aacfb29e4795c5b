//! Provisioned-site metadata and alias definition files.
//!
//! Every provisioned site gets an alias definition file under the sandbox's
//! `etc/sitectl/` directory so later commands can address it as `@<name>`.
//! The file is declarative TOML mapping the site name to its location:
//!
//! ```toml
//! [dev]
//! root = "/tmp/sitectl-sandbox/web"
//! uri = "dev"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

/// Metadata for one provisioned site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSpec {
    /// Alias name (also the sites-subdirectory name).
    pub name: String,
    /// Filesystem root of the installation the site lives under.
    pub root: PathBuf,
    /// URI distinguishing this site within the multi-site root.
    pub uri: String,
    /// Database connection string for this site.
    pub db_url: String,
}

#[derive(Serialize)]
struct AliasEntry<'a> {
    root: &'a str,
    uri: &'a str,
}

impl SiteSpec {
    /// File name of this site's alias definition.
    #[must_use]
    pub fn alias_file_name(&self) -> String {
        format!("{}.alias.toml", self.name)
    }

    /// Writes the alias definition file into `dir`, returning its path.
    pub fn write_alias(&self, dir: &Path) -> Result<PathBuf> {
        let mut aliases = BTreeMap::new();
        let root = self.root.display().to_string();
        aliases.insert(
            self.name.as_str(),
            AliasEntry {
                root: &root,
                uri: &self.uri,
            },
        );

        let path = dir.join(self.alias_file_name());
        let contents = toml::to_string(&aliases)?;
        fs::write(&path, contents)
            .with_context(|| format!("failed to write alias file {}", path.display()))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> SiteSpec {
        SiteSpec {
            name: "dev".to_string(),
            root: PathBuf::from("/tmp/sitectl-sandbox/web"),
            uri: "dev".to_string(),
            db_url: "mysql://root:@127.0.0.1/sbx_dev".to_string(),
        }
    }

    #[test]
    fn alias_file_name_follows_convention() {
        assert_eq!(spec().alias_file_name(), "dev.alias.toml");
    }

    #[test]
    fn write_alias_produces_root_and_uri_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = spec().write_alias(dir.path()).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let parsed: toml::Value = toml::from_str(&contents).unwrap();
        let dev = parsed.get("dev").expect("site table");
        assert_eq!(
            dev.get("root").and_then(|v| v.as_str()),
            Some("/tmp/sitectl-sandbox/web")
        );
        assert_eq!(dev.get("uri").and_then(|v| v.as_str()), Some("dev"));
    }
}
