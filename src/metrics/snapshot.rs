use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const LOG_TARGET: &str = "  snapshot";

/// A flat view of a metrics exposition captured at one instant.
///
/// Keys are series identities exactly as they appear in the exposition text,
/// label set included. Every labeled series additionally feeds a base-name
/// entry holding the running sum over all of its label variants, so callers
/// can track a single variant or a whole family by name.
///
/// Snapshots are never mutated after capture.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot(BTreeMap<String, f64>);

impl Snapshot {
    /// Parse Prometheus-style exposition text into a snapshot.
    ///
    /// Blank lines and `#` comment lines are ignored. Every other line is
    /// expected to carry a series identity followed by a sample value; the
    /// first whitespace-delimited token names the series and the last one is
    /// the value. Lines that do not parse are skipped individually and never
    /// fail the whole capture, so empty or entirely malformed input yields an
    /// empty snapshot.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut series = BTreeMap::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split_whitespace();
            let Some(name) = fields.next() else {
                continue;
            };

            let Some(raw_value) = fields.next_back() else {
                log::debug!(target: LOG_TARGET, "Skipping sample line without a value: '{line}'");
                continue;
            };

            let Ok(value) = raw_value.parse::<f64>() else {
                log::debug!(target: LOG_TARGET, "Skipping sample line with unparseable value: '{line}'");
                continue;
            };

            let _ = series.insert(name.to_string(), value);

            // Labeled variants also accumulate under their base name.
            if let Some((base, _)) = name.split_once('{')
                && !base.is_empty()
            {
                *series.entry(base.to_string()).or_insert(0.0) += value;
            }
        }

        Self(series)
    }

    /// Sample value for a series identity, if present.
    #[must_use]
    pub fn value(&self, series: &str) -> Option<f64> {
        self.0.get(series).copied()
    }

    /// Whether the snapshot carries the given series identity.
    #[must_use]
    pub fn contains(&self, series: &str) -> bool {
        self.0.contains_key(series)
    }

    /// Number of series entries, base-name aggregates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over series identities and values in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl FromIterator<(String, f64)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
