use core::fmt;
use serde::{Deserialize, Serialize};

/// How a globally scoped series is treated when sessions may run in
/// parallel.
///
/// Configuration carries this as free-form text; anything other than the
/// three recognized values is preserved as [`Unrecognized`] so evaluation
/// can fall back to warning behavior while citing the offending value.
///
/// [`Unrecognized`]: ParallelGlobalRule::Unrecognized
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParallelGlobalRule {
    /// Drop the series from measurements, recording a skip reason.
    Skip,

    /// Measure normally and append a warning.
    #[default]
    Warn,

    /// Do not measure; record a non-fatal error entry instead.
    Fail,

    /// Any other configured value. Behaves like [`Warn`] with an extra
    /// diagnostic warning.
    ///
    /// [`Warn`]: ParallelGlobalRule::Warn
    Unrecognized(String),
}

impl From<String> for ParallelGlobalRule {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "skip" => Self::Skip,
            "warn" => Self::Warn,
            "fail" => Self::Fail,
            _ => Self::Unrecognized(value),
        }
    }
}

impl From<ParallelGlobalRule> for String {
    fn from(rule: ParallelGlobalRule) -> Self {
        rule.to_string()
    }
}

impl fmt::Display for ParallelGlobalRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => f.write_str("skip"),
            Self::Warn => f.write_str("warn"),
            Self::Fail => f.write_str("fail"),
            Self::Unrecognized(value) => f.write_str(value),
        }
    }
}

/// Decision table for globally scoped series under parallel execution.
///
/// The table only has effect when `allow_parallel` is true; with parallel
/// execution disallowed, global series are evaluated like any other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationPolicy {
    /// Whether other sessions may be running concurrently with this one.
    #[serde(default)]
    pub allow_parallel: bool,

    /// Treatment of globally scoped series when `allow_parallel` is true.
    #[serde(default)]
    pub on_global_in_parallel: ParallelGlobalRule,
}

impl EvaluationPolicy {
    #[must_use]
    pub fn new(allow_parallel: bool, on_global_in_parallel: ParallelGlobalRule) -> Self {
        Self {
            allow_parallel,
            on_global_in_parallel,
        }
    }
}
