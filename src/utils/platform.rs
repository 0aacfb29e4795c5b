//! Platform-specific helpers.
//!
//! The harness runs identically on Windows, macOS, and Linux; this module
//! encapsulates the few places where the platforms disagree: which shell
//! executes an assembled command line, and how the external tool binary is
//! discovered.

use std::path::PathBuf;

/// Checks if the current platform is Windows.
///
/// This is a compile-time check; it selects the escaping slow path and the
/// shell used for command execution.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Returns the shell command and flag used to execute a command line.
///
/// A full command line (possibly carrying a `cd <dir>;` prefix) has to run
/// through a shell rather than being spawned directly.
///
/// # Returns
///
/// - Windows: `("cmd", "/C")`
/// - Unix-like: `("sh", "-c")`
#[must_use]
pub const fn get_shell_command() -> (&'static str, &'static str) {
    if is_windows() {
        ("cmd", "/C")
    } else {
        ("sh", "-c")
    }
}

/// Checks if a command is available in the system PATH.
#[must_use]
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

/// Locates an executable on the search path.
///
/// Returns `None` when the executable cannot be found; callers decide
/// whether that is fatal (the harness errors with the override variable
/// name so the fix is obvious).
#[must_use]
pub fn find_on_path(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_command_matches_platform() {
        let (shell, flag) = get_shell_command();

        #[cfg(windows)]
        {
            assert_eq!(shell, "cmd");
            assert_eq!(flag, "/C");
        }

        #[cfg(not(windows))]
        {
            assert_eq!(shell, "sh");
            assert_eq!(flag, "-c");
        }
    }

    #[test]
    fn command_exists_finds_the_shell() {
        #[cfg(unix)]
        assert!(command_exists("sh"));

        #[cfg(windows)]
        assert!(command_exists("cmd"));

        assert!(!command_exists("this_command_should_not_exist_12345"));
    }

    #[test]
    fn find_on_path_returns_none_for_missing() {
        assert!(find_on_path("this_command_should_not_exist_12345").is_none());
    }
}
