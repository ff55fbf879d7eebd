//! Small helpers shared across commands.

use crate::Result;
use clap::ValueEnum;
use ohno::app_err;
use std::io::{IsTerminal, stdout};

/// Control when command output uses color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Color only when standard output is a terminal
    Auto,
    /// Color unconditionally
    Always,
    /// Plain text only
    Never,
}

impl ColorMode {
    /// Whether output to stdout should be colored right now.
    #[must_use]
    pub fn is_enabled(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => stdout().is_terminal(),
        }
    }
}

/// Sanitize a string for use as a file name component.
///
/// Keeps ASCII alphanumerics, `.`, `_`, and `-`; every other character is
/// replaced with `-` so identifiers taken from test names or CI variables
/// cannot escape the artifacts directory or produce unportable names.
#[must_use]
pub fn sanitize_filename(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// The first of the two values with non-blank content, trimmed.
///
/// Identity fields can arrive from several places, like a test case name
/// given on the command line with a fallback derived from the work itself.
#[must_use]
pub fn first_non_blank<'a>(primary: &'a str, fallback: &'a str) -> &'a str {
    let primary = primary.trim();
    if primary.is_empty() { fallback.trim() } else { primary }
}

/// Split a `key=value` argument into its parts.
///
/// The key must be non-empty after trimming; the value may be empty.
pub fn parse_label(s: &str) -> Result<(String, String)> {
    let Some((key, value)) = s.split_once('=') else {
        return Err(app_err!("label '{s}' must be in key=value form"));
    };

    let key = key.trim();
    if key.is_empty() {
        return Err(app_err!("label '{s}' has an empty key"));
    }

    Ok((key.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_passes_safe_characters() {
        assert_eq!(sanitize_filename("run-42_final.v2"), "run-42_final.v2");
        assert_eq!(sanitize_filename("Create Widget"), "Create-Widget");
    }

    #[test]
    fn test_sanitize_replaces_path_separators() {
        assert_eq!(sanitize_filename("suite/case"), "suite-case");
        assert_eq!(sanitize_filename("..\\escape"), "..-escape");
    }

    #[test]
    fn test_sanitize_replaces_non_ascii() {
        assert_eq!(sanitize_filename("caf\u{e9}"), "caf-");
    }

    #[test]
    fn test_first_non_blank_prefers_primary() {
        assert_eq!(first_non_blank("  primary  ", "fallback"), "primary");
        assert_eq!(first_non_blank("   ", " fallback "), "fallback");
        assert_eq!(first_non_blank("", ""), "");
    }

    #[test]
    fn test_parse_label_splits_on_first_equals() {
        assert_eq!(parse_label("env=ci").unwrap(), ("env".to_string(), "ci".to_string()));
        assert_eq!(parse_label("query=a=b").unwrap(), ("query".to_string(), "a=b".to_string()));
        assert_eq!(parse_label("empty=").unwrap(), ("empty".to_string(), String::new()));
    }

    #[test]
    fn test_parse_label_rejects_malformed_input() {
        assert!(parse_label("no-separator").unwrap_err().to_string().contains("key=value"));
        assert!(parse_label("=value").unwrap_err().to_string().contains("empty key"));
    }
}
