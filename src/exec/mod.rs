//! Subprocess execution for assembled command lines.
//!
//! This module provides the building and running half of the harness: the
//! [`escape()`] function turns arbitrary strings into shell-safe tokens, the
//! [`SiteCommand`] builder assembles full tool invocations from structured
//! parts, and the [`Executor`] runs a finished command line through the
//! platform shell while capturing stdout and the exit code.
//!
//! Execution is synchronous and blocking: each invocation runs to completion
//! before the harness continues, and a hung external process hangs the test
//! run. There are no retries; an unexpected exit code is an error that fails
//! the enclosing test.

pub mod command_builder;
pub mod escape;

pub use command_builder::{CommandOption, SiteCommand};
pub use escape::escape;

use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

use crate::core::HarnessError;
use crate::utils::platform::get_shell_command;

/// Runs command lines through the platform shell and captures their output.
///
/// The working directory and environment overrides are scoped to each child
/// process; the harness never changes its own working directory or
/// environment. Standard error is left attached to the test runner's console
/// so tool diagnostics stay visible.
#[derive(Debug)]
pub struct Executor {
    working_dir: PathBuf,
    env: Vec<(String, String)>,
    output: Vec<String>,
}

impl Executor {
    /// Creates an executor running commands in `working_dir` with the given
    /// environment overrides applied to every child process.
    #[must_use]
    pub fn new(working_dir: PathBuf, env: Vec<(String, String)>) -> Self {
        Self {
            working_dir,
            env,
            output: Vec::new(),
        }
    }

    /// Executes `command_line`, expecting it to exit with `expected`.
    ///
    /// Stdout is captured as an ordered sequence of lines and retained for
    /// [`output`](Self::output) / [`output_lines`](Self::output_lines); the
    /// previous capture is discarded first, including on failure paths. An
    /// exit code other than `expected` produces
    /// [`HarnessError::UnexpectedExitCode`] carrying the command line.
    ///
    /// Returns the exit code on success.
    pub fn execute(&mut self, command_line: &str, expected: i32) -> Result<i32> {
        self.output.clear();

        let (shell, flag) = get_shell_command();
        tracing::debug!(target: "exec", "Executing command: {shell} {flag} {command_line}");

        let mut cmd = Command::new(shell);
        cmd.arg(flag)
            .arg(command_line)
            .current_dir(&self.working_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .stdin(Stdio::null());
        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        let out = cmd
            .output()
            .with_context(|| format!("failed to spawn shell for `{command_line}`"))?;

        // Capture output before the exit-code check so a failing command's
        // stdout is still inspectable from the test.
        self.output = String::from_utf8_lossy(&out.stdout)
            .lines()
            .map(str::to_string)
            .collect();

        let actual = out.status.code().ok_or_else(|| HarnessError::NoExitCode {
            command: command_line.to_string(),
        })?;
        tracing::debug!(target: "exec", "Command exited with code {actual}");

        if actual != expected {
            return Err(HarnessError::UnexpectedExitCode {
                command: command_line.to_string(),
                expected,
                actual,
            }
            .into());
        }
        Ok(actual)
    }

    /// The last captured output as a single newline-joined string.
    #[must_use]
    pub fn output(&self) -> String {
        self.output.join("\n")
    }

    /// The last captured output as an ordered sequence of lines.
    #[must_use]
    pub fn output_lines(&self) -> &[String] {
        &self.output
    }
}
