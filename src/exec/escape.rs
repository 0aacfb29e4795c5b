//! Shell-argument escaping.
//!
//! Arguments and option values are spliced into a single command line that
//! runs through the platform shell, so every caller-supplied string passes
//! through [`escape`] first. Tokens matching a conservative pattern are left
//! untouched to keep logged command lines readable; everything else gets
//! platform-appropriate quoting.

use std::sync::OnceLock;

use regex::Regex;

use crate::utils::platform::is_windows;

/// Tokens matching this need no quoting on either platform.
fn simple_token() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("^[a-zA-Z0-9.:/_-]*$").expect("valid literal pattern"))
}

/// Escapes `arg` for splicing into a shell command line.
///
/// Simple tokens (alphanumerics plus `. : / _ -`, including the empty
/// string) are returned unchanged; the command builder later filters empty
/// tokens out. Anything else is quoted for the platform shell:
///
/// - Unix: wrapped in single quotes, embedded single quotes rewritten as
///   `'\''`.
/// - Windows: backslashes doubled, embedded double and single quotes
///   backslash-escaped, the result wrapped in double quotes.
///
/// Any input produces a valid token; there are no error conditions.
#[must_use]
pub fn escape(arg: &str) -> String {
    if simple_token().is_match(arg) {
        return arg.to_string();
    }
    if is_windows() {
        escape_windows(arg)
    } else {
        escape_unix(arg)
    }
}

/// Single-quote escaping with the `'\''` dance for embedded quotes.
fn escape_unix(arg: &str) -> String {
    let mut escaped = String::with_capacity(arg.len() + 2);
    escaped.push('\'');
    for ch in arg.chars() {
        if ch == '\'' {
            escaped.push_str("'\\''");
        } else {
            escaped.push(ch);
        }
    }
    escaped.push('\'');
    escaped
}

/// Double-quote escaping for `cmd.exe`.
fn escape_windows(arg: &str) -> String {
    let doubled = arg.replace('\\', "\\\\");
    let quoted = doubled.replace('"', "\\\"").replace('\'', "\\'");
    format!("\"{quoted}\"")
}
