use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered label set attached to a session result.
pub type Labels = BTreeMap<String, String>;

/// Free-form identification of the run a session belongs to.
///
/// Every field is opaque to the measurement core and recorded verbatim in
/// the artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMeta {
    #[serde(default)]
    pub method: String,

    #[serde(default)]
    pub scope: String,

    #[serde(default)]
    pub run_id: String,

    #[serde(default)]
    pub suite: String,

    #[serde(default)]
    pub test_case: String,

    #[serde(default)]
    pub namespace: String,
}

impl SessionMeta {
    /// Label set derived from the non-empty meta fields.
    #[must_use]
    pub fn to_labels(&self) -> Labels {
        let mut labels = Labels::new();
        let fields = [
            ("method", &self.method),
            ("scope", &self.scope),
            ("run_id", &self.run_id),
            ("suite", &self.suite),
            ("test_case", &self.test_case),
            ("namespace", &self.namespace),
        ];

        for (key, value) in fields {
            if !value.is_empty() {
                let _ = labels.insert(key.to_string(), value.clone());
            }
        }

        labels
    }
}

/// The terminal record of one measurement session.
///
/// Constructed exactly once, when the session ends, and immutable from then
/// on. Measurements and their quality notes are kept separate so a consumer
/// can tell "the delta is 5" apart from "the delta could not be produced"
/// without parsing message strings. Maps use sorted keys so serialized
/// artifacts are deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    #[serde(default)]
    pub meta: SessionMeta,

    #[serde(default)]
    pub labels: Labels,

    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,

    /// Series name to raw delta over the measurement window.
    #[serde(default)]
    pub measurements: BTreeMap<String, f64>,

    /// Series name to the reason no delta was produced for it.
    #[serde(default)]
    pub skipped: BTreeMap<String, String>,

    #[serde(default)]
    pub warnings: Vec<String>,

    /// Non-fatal errors recorded during evaluation. These never abort a
    /// session; they mark measurements as unusable for reporting.
    #[serde(default)]
    pub errors: Vec<String>,
}

impl SessionResult {
    /// Wall-clock span of the measurement window.
    #[must_use]
    pub fn elapsed(&self) -> chrono::Duration {
        self.end_time - self.start_time
    }

    /// True when every tracked series produced a usable delta.
    ///
    /// A negative or non-finite delta counts as unusable here: for
    /// counter-like series it means a reset or a broken sample, so the
    /// measurement cannot stand in a report even though the session itself
    /// completed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
            && self.errors.is_empty()
            && self.measurements.values().all(|delta| delta.is_finite() && *delta >= 0.0)
    }
}
