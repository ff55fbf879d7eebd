//! Metric snapshots, tracked-series definitions, and delta evaluation
//!
//! This module owns everything that happens between two captures of a metrics
//! exposition: parsing the text into a flat [`Snapshot`], describing which
//! series a session tracks ([`MetricDef`]), deciding how globally scoped
//! series behave under parallel execution ([`EvaluationPolicy`]), and turning
//! a pair of snapshots into deltas ([`evaluate`]).
//!
//! # Implementation Model
//!
//! A [`Snapshot`] is an immutable map from series identity to a floating point
//! sample, built by [`Snapshot::parse`] from Prometheus-style exposition text.
//! Labeled series contribute both their fully qualified entry and a running
//! sum under their base name, so a tracked series can name either a single
//! label variant or the whole family.
//!
//! [`evaluate`] walks a definition set over a start and an end snapshot. A
//! series missing from either side is recorded as skipped rather than raised
//! as an error; globally scoped series consult the policy first, which may
//! skip them, let them through with a warning, or record a non-fatal error.
//! The resulting [`Evaluation`] carries measurements and every quality note
//! separately, leaving pass/fail judgements to the caller.

mod def;
mod delta;
mod policy;
mod snapshot;

pub use def::{MetricDef, MetricScope};
pub use delta::{Evaluation, evaluate};
pub use policy::{EvaluationPolicy, ParallelGlobalRule};
pub use snapshot::Snapshot;
