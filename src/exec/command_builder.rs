//! Builder for external-tool command lines.
//!
//! A [`SiteCommand`] collects the structured parts of one tool invocation —
//! command name, positional arguments, options, an optional site target, an
//! optional working directory — and assembles the escaped, space-joined
//! command line the [`Executor`](crate::exec::Executor) runs. Two flags are
//! injected into every invocation: the verbosity flag matching the ambient
//! log level, and `--nocolor` so captured output stays free of escape
//! sequences.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::constants::EXIT_SUCCESS;
use crate::exec::escape::escape;
use crate::harness::Harness;
use crate::logger::LogLevel;

/// One command-line option, tagged by kind.
///
/// Distinguishing flags from valued options at the type level removes the
/// ambiguity between "no value" and "empty string value": a [`Flag`] renders
/// as `--name`, a [`Value`] always renders as `--name=<escaped value>`, even
/// when the value is empty.
///
/// [`Flag`]: CommandOption::Flag
/// [`Value`]: CommandOption::Value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOption {
    /// A boolean flag: `--name`.
    Flag(String),
    /// A valued option: `--name=value`.
    Value(String, String),
}

impl CommandOption {
    fn render(&self) -> String {
        match self {
            Self::Flag(name) => format!("--{name}"),
            Self::Value(name, value) => format!("--{name}={}", escape(value)),
        }
    }
}

/// Fluent builder for one external-tool invocation.
///
/// # Examples
///
/// ```rust,no_run
/// use sitectl_harness::{Harness, SiteCommand};
///
/// # fn example(harness: &mut Harness) -> anyhow::Result<()> {
/// SiteCommand::new("site-install")
///     .arg("testing")
///     .option("sites-subdir", "dev")
///     .flag("yes")
///     .site("@dev")
///     .run(harness)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SiteCommand {
    command: String,
    args: Vec<String>,
    options: Vec<CommandOption>,
    site: Option<String>,
    cd: Option<PathBuf>,
    expected_exit: i32,
}

impl SiteCommand {
    /// Starts a builder for `command`, expecting a successful exit.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            options: Vec::new(),
            site: None,
            cd: None,
            expected_exit: EXIT_SUCCESS,
        }
    }

    /// Adds a positional argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds multiple positional arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Adds a boolean flag (`--name`).
    pub fn flag(mut self, name: impl Into<String>) -> Self {
        self.options.push(CommandOption::Flag(name.into()));
        self
    }

    /// Adds a valued option (`--name=value`); the value is escaped.
    pub fn option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push(CommandOption::Value(name.into(), value.into()));
        self
    }

    /// Targets a site alias or specification (escaped; include the leading
    /// `@` for aliases).
    pub fn site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    /// Prefixes the command line with `cd <dir>;`.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Sets the expected exit code (defaults to success).
    #[must_use]
    pub const fn expect_exit(mut self, code: i32) -> Self {
        self.expected_exit = code;
        self
    }

    /// The exit code this invocation is expected to produce.
    #[must_use]
    pub const fn expected_exit(&self) -> i32 {
        self.expected_exit
    }

    /// Assembles the full command line.
    ///
    /// Token order: `cd` prefix, executable, site target, command name,
    /// positional arguments, the verbosity flag for `level` (after the
    /// caller's arguments), then options in insertion order with `--nocolor`
    /// appended last. Empty tokens are dropped before joining, so absent
    /// parts never leave stray separators.
    #[must_use]
    pub fn assemble(&self, tool: &Path, level: LogLevel) -> String {
        let mut tokens: Vec<String> = Vec::new();

        if let Some(ref dir) = self.cd {
            tokens.push(format!("cd {};", escape(&dir.display().to_string())));
        }
        tokens.push(tool.display().to_string());
        if let Some(ref site) = self.site {
            tokens.push(escape(site));
        }
        tokens.push(self.command.clone());
        for arg in &self.args {
            tokens.push(escape(arg));
        }
        if let Some(flag) = level.flag() {
            tokens.push(flag.to_string());
        }
        for option in &self.options {
            tokens.push(option.render());
        }
        tokens.push("--nocolor".to_string());

        tokens.retain(|token| !token.is_empty());
        tokens.join(" ")
    }

    /// Assembles the command line against the harness configuration and
    /// executes it, returning the exit code.
    pub fn run(self, harness: &mut Harness) -> Result<i32> {
        let line = self.assemble(&harness.config().tool, harness.config().log_level);
        harness.execute(&line, self.expected_exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool() -> PathBuf {
        PathBuf::from("/usr/local/bin/sitectl")
    }

    #[test]
    fn minimal_command_has_no_stray_separators() {
        let line = SiteCommand::new("status").assemble(&tool(), LogLevel::Unset);
        assert_eq!(line, "/usr/local/bin/sitectl status --nocolor");
        assert!(!line.contains("  "), "double space in: {line}");
    }

    #[test]
    fn flags_and_values_render_distinctly() {
        let line = SiteCommand::new("archive-restore")
            .flag("foo")
            .option("bar", "baz qux")
            .assemble(&tool(), LogLevel::Unset);
        assert!(line.contains(" --foo "));
        assert!(!line.contains("--foo="));
        #[cfg(unix)]
        assert!(line.contains("--bar='baz qux'"));
        #[cfg(windows)]
        assert!(line.contains("--bar=\"baz qux\""));
    }

    #[test]
    fn empty_valued_option_keeps_equals_form() {
        let line = SiteCommand::new("status")
            .option("uri", "")
            .assemble(&tool(), LogLevel::Unset);
        assert!(line.contains("--uri="));
    }

    #[test]
    fn site_target_precedes_command() {
        let line = SiteCommand::new("status").site("@dev").assemble(&tool(), LogLevel::Unset);
        let site_pos = line.find("'@dev'").or_else(|| line.find("\"@dev\"")).unwrap();
        let command_pos = line.find(" status").unwrap();
        assert!(site_pos < command_pos);
    }

    #[test]
    fn cd_prefix_comes_first() {
        let line = SiteCommand::new("status")
            .current_dir("/some/dir")
            .assemble(&tool(), LogLevel::Unset);
        assert!(line.starts_with("cd /some/dir;"), "got: {line}");
    }

    #[test]
    fn verbosity_flag_follows_positional_args() {
        let line = SiteCommand::new("download")
            .arg("core-7")
            .option("destination", "/tmp/sandbox")
            .assemble(&tool(), LogLevel::Verbose);
        let arg_pos = line.find("core-7").unwrap();
        let level_pos = line.find("--verbose").unwrap();
        let option_pos = line.find("--destination").unwrap();
        assert!(arg_pos < level_pos && level_pos < option_pos, "got: {line}");
    }

    #[test]
    fn nocolor_is_always_last() {
        let line = SiteCommand::new("status")
            .flag("full")
            .option("uri", "dev")
            .assemble(&tool(), LogLevel::Debug);
        assert!(line.ends_with("--nocolor"), "got: {line}");
    }

    #[test]
    fn arguments_are_escaped() {
        let line = SiteCommand::new("sql-query")
            .arg("select * from users")
            .assemble(&tool(), LogLevel::Unset);
        #[cfg(unix)]
        assert!(line.contains("'select * from users'"));
        #[cfg(windows)]
        assert!(line.contains("\"select * from users\""));
    }

    #[test]
    fn expected_exit_defaults_to_success() {
        assert_eq!(SiteCommand::new("status").expected_exit(), EXIT_SUCCESS);
        assert_eq!(SiteCommand::new("status").expect_exit(1).expected_exit(), 1);
    }
}
