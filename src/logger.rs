//! Console diagnostics gated by an invocation-derived verbosity level.
//!
//! The level is computed once from the flags the test run was invoked with
//! (`--debug` wins over `--verbose`) and stored in the configuration; it
//! also decides which verbosity flag the command builder injects into every
//! external-tool invocation.

use colored::Colorize;

/// Verbosity level of the current test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// No verbosity flag was passed; only notices are printed.
    #[default]
    Unset,
    /// `--verbose` was passed; notices and verbose messages are printed.
    Verbose,
    /// `--debug` was passed; everything is printed.
    Debug,
}

/// Category of a single log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogType {
    /// Always-relevant diagnostics (the default).
    #[default]
    Notice,
    /// Progress detail, printed from `--verbose` up.
    Verbose,
    /// Debugging detail, printed only under `--debug`.
    Debug,
}

impl LogLevel {
    /// Derives the level from invocation arguments.
    ///
    /// `--debug` takes precedence over `--verbose`; anything else leaves the
    /// level unset. Takes the arguments explicitly so the derivation is
    /// testable without manipulating the process environment.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut level = Self::Unset;
        for arg in args {
            match arg.as_ref() {
                "--debug" => return Self::Debug,
                "--verbose" => level = Self::Verbose,
                _ => {}
            }
        }
        level
    }

    /// Derives the level from the current process's arguments.
    #[must_use]
    pub fn from_invocation() -> Self {
        Self::from_args(std::env::args())
    }

    /// The verbosity flag to forward to the external tool, if any.
    #[must_use]
    pub const fn flag(self) -> Option<&'static str> {
        match self {
            Self::Unset => None,
            Self::Verbose => Some("--verbose"),
            Self::Debug => Some("--debug"),
        }
    }

    /// Whether a message of `ty` should be printed at this level.
    #[must_use]
    pub const fn prints(self, ty: LogType) -> bool {
        match self {
            Self::Debug => true,
            Self::Verbose => matches!(ty, LogType::Notice | LogType::Verbose),
            Self::Unset => matches!(ty, LogType::Notice),
        }
    }
}

/// Prints diagnostic lines to the console, filtered by [`LogLevel`].
#[derive(Debug, Clone, Copy)]
pub struct Logger {
    level: LogLevel,
}

impl Logger {
    /// Creates a logger printing at `level`.
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self { level }
    }

    /// The level this logger filters at.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// Prints `message` if its type passes the level gate.
    ///
    /// Output is padded with blank lines so it stays readable inside the
    /// test runner's own output.
    pub fn log(&self, message: &str, ty: LogType) {
        if !self.level.prints(ty) {
            return;
        }
        let prefix = match ty {
            LogType::Notice => "Log:".normal(),
            LogType::Verbose => "Log:".cyan(),
            LogType::Debug => "Log:".dimmed(),
        };
        println!("\n{prefix} {message}\n");
    }

    /// Logs a [`LogType::Notice`] message.
    pub fn notice(&self, message: &str) {
        self.log(message, LogType::Notice);
    }

    /// Logs a [`LogType::Verbose`] message.
    pub fn verbose(&self, message: &str) {
        self.log(message, LogType::Verbose);
    }

    /// Logs a [`LogType::Debug`] message.
    pub fn debug(&self, message: &str) {
        self.log(message, LogType::Debug);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_from_args_prefers_debug() {
        assert_eq!(LogLevel::from_args(["--verbose", "--debug"]), LogLevel::Debug);
        assert_eq!(LogLevel::from_args(["--debug", "--verbose"]), LogLevel::Debug);
    }

    #[test]
    fn level_from_args_detects_verbose() {
        assert_eq!(LogLevel::from_args(["test-filter", "--verbose"]), LogLevel::Verbose);
    }

    #[test]
    fn level_from_args_defaults_to_unset() {
        assert_eq!(LogLevel::from_args(["test-filter", "--nocapture"]), LogLevel::Unset);
        assert_eq!(LogLevel::from_args(Vec::<String>::new()), LogLevel::Unset);
    }

    #[test]
    fn unset_prints_notice_only() {
        let level = LogLevel::Unset;
        assert!(level.prints(LogType::Notice));
        assert!(!level.prints(LogType::Verbose));
        assert!(!level.prints(LogType::Debug));
    }

    #[test]
    fn verbose_prints_notice_and_verbose() {
        let level = LogLevel::Verbose;
        assert!(level.prints(LogType::Notice));
        assert!(level.prints(LogType::Verbose));
        assert!(!level.prints(LogType::Debug));
    }

    #[test]
    fn debug_prints_everything() {
        let level = LogLevel::Debug;
        assert!(level.prints(LogType::Notice));
        assert!(level.prints(LogType::Verbose));
        assert!(level.prints(LogType::Debug));
    }

    #[test]
    fn flags_match_levels() {
        assert_eq!(LogLevel::Unset.flag(), None);
        assert_eq!(LogLevel::Verbose.flag(), Some("--verbose"));
        assert_eq!(LogLevel::Debug.flag(), Some("--debug"));
    }
}
