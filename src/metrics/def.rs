use serde::{Deserialize, Serialize};

/// How a tracked series relates to concurrently running units of work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MetricScope {
    /// The series reflects state shared across every concurrently running
    /// unit of work, so a mid-flight sample cannot be attributed to one.
    Global,

    /// The series is attributable solely to the unit of work under
    /// measurement.
    #[default]
    Scoped,
}

/// One series a session tracks between its two snapshots.
///
/// `name` is matched by exact key equality against snapshot keys. It may be
/// a fully qualified series identity (label set included) or a bare metric
/// name, in which case it matches the base-name aggregate the parser builds
/// over all label variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricDef {
    pub name: String,

    #[serde(default)]
    pub scope: MetricScope,
}

impl MetricDef {
    #[must_use]
    pub fn new(name: impl Into<String>, scope: MetricScope) -> Self {
        Self { name: name.into(), scope }
    }

    /// The well-known definitions tracked when the caller supplies none.
    #[must_use]
    pub fn common_set() -> Vec<Self> {
        vec![Self::new("controller_runtime_reconcile_total", MetricScope::Global)]
    }
}
