//! Error handling for the harness.
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** ([`HarnessError`]) for the failure modes the
//!    harness can hit on its own: a subprocess exiting with the wrong code,
//!    the external tool missing, filesystem operations failing.
//! 2. **Contextual propagation** via [`anyhow`] at every fallible seam, so a
//!    failing test surfaces the full chain (which command, which path, why).
//!
//! There is deliberately no retry or recovery layer: every external command
//! is expected to either succeed or fail the enclosing test immediately, and
//! a failed provisioning step leaves the sandbox as-is for the remainder of
//! the test class.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for harness operations.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// A subprocess exited with a code other than the expected one.
    ///
    /// Carries the full command line so the failing test names the exact
    /// invocation that misbehaved.
    #[error("unexpected exit code for `{command}`: expected {expected}, got {actual}")]
    UnexpectedExitCode {
        /// The fully assembled command line that was executed.
        command: String,
        /// The exit code the caller expected.
        expected: i32,
        /// The exit code the subprocess actually returned.
        actual: i32,
    },

    /// A subprocess was killed by a signal and produced no exit code.
    #[error("command terminated without an exit code: `{command}`")]
    NoExitCode {
        /// The fully assembled command line that was executed.
        command: String,
    },

    /// The external tool executable could not be located.
    #[error("external tool `{name}` not found: set {env_var} or add it to PATH")]
    ToolNotFound {
        /// Executable name that was searched for.
        name: String,
        /// Environment variable that overrides discovery.
        env_var: String,
    },

    /// A filesystem operation failed during sandbox or cache management.
    #[error("filesystem operation failed: {operation} on {}", path.display())]
    FileSystemError {
        /// Short description of the operation (e.g. "remove file").
        operation: String,
        /// The path the operation was applied to.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be assembled from the environment.
    #[error("configuration error: {message}")]
    ConfigError {
        /// Human-readable description of what was invalid.
        message: String,
    },
}

impl HarnessError {
    /// Builds a [`HarnessError::FileSystemError`] for `operation` on `path`.
    pub fn fs(operation: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileSystemError {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }
}
