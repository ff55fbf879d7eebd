use crate::metrics::def::{MetricDef, MetricScope};
use crate::metrics::policy::{EvaluationPolicy, ParallelGlobalRule};
use crate::metrics::snapshot::Snapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const LOG_TARGET: &str = "     delta";

/// Outcome of evaluating a definition set over two snapshots.
///
/// Measurement-quality issues are recorded here rather than raised as
/// errors: a series missing from a snapshot lands in `skipped`, policy
/// decisions land in `skipped`, `warnings`, or `errors` per the decision
/// table. Nothing in an evaluation is fatal by itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub measurements: BTreeMap<String, f64>,
    pub skipped: BTreeMap<String, String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Evaluation {
    /// True when every tracked series produced a delta and no quality
    /// issues were recorded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.errors.is_empty()
    }
}

/// Compute deltas for every definition between a start and an end snapshot.
///
/// A definition absent from either snapshot is skipped with reason
/// `"metric missing"`. Globally scoped definitions consult the policy first
/// when parallel execution is allowed; the policy may suppress the
/// measurement entirely or let it through with diagnostics attached.
/// Deltas are raw `end - start` values; negative deltas (counter resets)
/// are reported as-is and left for the caller to interpret.
#[must_use]
pub fn evaluate(defs: &[MetricDef], policy: &EvaluationPolicy, start: &Snapshot, end: &Snapshot) -> Evaluation {
    let mut outcome = Evaluation::default();

    for def in defs {
        let (Some(before), Some(after)) = (start.value(&def.name), end.value(&def.name)) else {
            log::debug!(target: LOG_TARGET, "Series '{}' is absent from at least one snapshot", def.name);
            let _ = outcome.skipped.insert(def.name.clone(), "metric missing".to_string());
            continue;
        };

        if def.scope == MetricScope::Global && policy.allow_parallel {
            match &policy.on_global_in_parallel {
                ParallelGlobalRule::Skip => {
                    let _ = outcome.skipped.insert(def.name.clone(), "global metric in parallel mode".to_string());
                    continue;
                }
                ParallelGlobalRule::Fail => {
                    outcome.errors.push(format!("policy fail: global metric in parallel mode: {}", def.name));
                    continue;
                }
                ParallelGlobalRule::Warn => {
                    outcome.warnings.push(format!("global metric used in parallel mode: {}", def.name));
                }
                ParallelGlobalRule::Unrecognized(value) => {
                    outcome.warnings.push(format!("global metric used in parallel mode: {}", def.name));
                    outcome
                        .warnings
                        .push(format!("unrecognized on_global_in_parallel value '{value}', treating as warn"));
                }
            }
        }

        let _ = outcome.measurements.insert(def.name.clone(), after - before);
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(entries: &[(&str, f64)]) -> Snapshot {
        entries.iter().map(|(name, value)| ((*name).to_string(), *value)).collect()
    }

    fn global_def(name: &str) -> Vec<MetricDef> {
        vec![MetricDef::new(name, MetricScope::Global)]
    }

    #[test]
    fn test_delta_is_end_minus_start() {
        let defs = vec![MetricDef::new("c", MetricScope::Scoped)];
        let outcome = evaluate(
            &defs,
            &EvaluationPolicy::default(),
            &snapshot(&[("c", 10.0)]),
            &snapshot(&[("c", 15.0)]),
        );

        assert_eq!(outcome.measurements.get("c"), Some(&5.0));
        assert!(outcome.skipped.is_empty());
        assert!(outcome.warnings.is_empty());
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_missing_metric_is_skipped() {
        let defs = vec![MetricDef::new("c", MetricScope::Scoped)];
        let outcome = evaluate(&defs, &EvaluationPolicy::default(), &snapshot(&[]), &snapshot(&[("c", 1.0)]));

        assert!(outcome.measurements.is_empty());
        assert_eq!(outcome.skipped.get("c").map(String::as_str), Some("metric missing"));
    }

    #[test]
    fn test_negative_delta_passes_through() {
        let defs = vec![MetricDef::new("c", MetricScope::Scoped)];
        let outcome = evaluate(
            &defs,
            &EvaluationPolicy::default(),
            &snapshot(&[("c", 10.0)]),
            &snapshot(&[("c", 4.0)]),
        );

        assert_eq!(outcome.measurements.get("c"), Some(&-6.0));
        assert!(outcome.is_clean());
    }

    #[test]
    fn test_parallel_skip_rule() {
        let policy = EvaluationPolicy::new(true, ParallelGlobalRule::Skip);
        let outcome = evaluate(&global_def("g"), &policy, &snapshot(&[("g", 1.0)]), &snapshot(&[("g", 2.0)]));

        assert!(outcome.measurements.is_empty());
        assert_eq!(outcome.skipped.get("g").map(String::as_str), Some("global metric in parallel mode"));
        assert!(outcome.warnings.is_empty());
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_parallel_warn_rule_measures_with_one_warning() {
        let policy = EvaluationPolicy::new(true, ParallelGlobalRule::Warn);
        let outcome = evaluate(&global_def("g"), &policy, &snapshot(&[("g", 1.0)]), &snapshot(&[("g", 2.0)]));

        assert_eq!(outcome.measurements.get("g"), Some(&1.0));
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("global metric used in parallel mode: g"));
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_parallel_fail_rule_records_error_without_measuring() {
        let policy = EvaluationPolicy::new(true, ParallelGlobalRule::Fail);
        let outcome = evaluate(&global_def("g"), &policy, &snapshot(&[("g", 1.0)]), &snapshot(&[("g", 2.0)]));

        assert!(outcome.measurements.is_empty());
        assert!(outcome.skipped.is_empty());
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].contains("policy fail: global metric in parallel mode: g"));
    }

    #[test]
    fn test_parallel_unrecognized_rule_warns_twice_and_measures() {
        let policy = EvaluationPolicy::new(true, ParallelGlobalRule::Unrecognized("sometimes".to_string()));
        let outcome = evaluate(&global_def("g"), &policy, &snapshot(&[("g", 1.0)]), &snapshot(&[("g", 2.0)]));

        assert_eq!(outcome.measurements.get("g"), Some(&1.0));
        assert_eq!(outcome.warnings.len(), 2);
        assert!(outcome.warnings[1].contains("unrecognized on_global_in_parallel value 'sometimes'"));
    }

    #[test]
    fn test_policy_inert_when_parallel_disallowed() {
        let policy = EvaluationPolicy::new(false, ParallelGlobalRule::Fail);
        let outcome = evaluate(&global_def("g"), &policy, &snapshot(&[("g", 1.0)]), &snapshot(&[("g", 3.0)]));

        assert_eq!(outcome.measurements.get("g"), Some(&2.0));
        assert!(outcome.warnings.is_empty());
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_policy_ignores_scoped_series() {
        let policy = EvaluationPolicy::new(true, ParallelGlobalRule::Skip);
        let defs = vec![MetricDef::new("s", MetricScope::Scoped)];
        let outcome = evaluate(&defs, &policy, &snapshot(&[("s", 1.0)]), &snapshot(&[("s", 5.0)]));

        assert_eq!(outcome.measurements.get("s"), Some(&4.0));
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn test_missing_check_precedes_policy() {
        let policy = EvaluationPolicy::new(true, ParallelGlobalRule::Fail);
        let outcome = evaluate(&global_def("g"), &policy, &snapshot(&[]), &snapshot(&[("g", 2.0)]));

        assert_eq!(outcome.skipped.get("g").map(String::as_str), Some("metric missing"));
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_multiple_definitions_evaluate_independently() {
        let policy = EvaluationPolicy::new(true, ParallelGlobalRule::Skip);
        let defs = vec![
            MetricDef::new("g", MetricScope::Global),
            MetricDef::new("s", MetricScope::Scoped),
            MetricDef::new("absent", MetricScope::Scoped),
        ];
        let start = snapshot(&[("g", 1.0), ("s", 10.0)]);
        let end = snapshot(&[("g", 2.0), ("s", 12.5)]);
        let outcome = evaluate(&defs, &policy, &start, &end);

        assert_eq!(outcome.measurements.len(), 1);
        assert_eq!(outcome.measurements.get("s"), Some(&2.5));
        assert_eq!(outcome.skipped.len(), 2);
        assert_eq!(outcome.skipped.get("g").map(String::as_str), Some("global metric in parallel mode"));
        assert_eq!(outcome.skipped.get("absent").map(String::as_str), Some("metric missing"));
    }
}
