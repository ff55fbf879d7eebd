use crate::Result;
use crate::metrics::{EvaluationPolicy, MetricDef, Snapshot, evaluate};
use crate::probe::SnapshotSource;
use crate::session::result::{Labels, SessionMeta, SessionResult};
use crate::sink::ResultSink;
use chrono::{DateTime, Utc};
use core::fmt;
use core::mem;
use ohno::bail;

const LOG_TARGET: &str = "   session";

#[derive(Debug)]
enum State {
    NotStarted,
    Started { snapshot: Snapshot, at: DateTime<Utc> },
    Ended,
}

/// What ending a session produced.
///
/// The result is retained even when the sink rejected it, so the caller can
/// inspect the measurements and retry persistence on its own terms.
#[derive(Debug)]
pub struct Completion {
    pub result: SessionResult,
    pub sink_error: Option<ohno::AppError>,
}

/// One measurement window around a single unit of work.
///
/// A session is created per unit of work, started just before the work
/// begins and ended just after it finishes. Each of those calls captures
/// one snapshot from the source; ending evaluates the tracked definitions
/// between the two captures and hands the finished [`SessionResult`] to the
/// sink, if one is configured.
pub struct Session {
    source: Box<dyn SnapshotSource>,
    defs: Vec<MetricDef>,
    policy: EvaluationPolicy,
    sink: Option<Box<dyn ResultSink>>,
    meta: SessionMeta,
    labels: Labels,
    state: State,
}

impl Session {
    #[must_use]
    pub fn new(source: impl SnapshotSource + 'static, defs: Vec<MetricDef>, policy: EvaluationPolicy) -> Self {
        Self {
            source: Box::new(source),
            defs,
            policy,
            sink: None,
            meta: SessionMeta::default(),
            labels: Labels::new(),
            state: State::NotStarted,
        }
    }

    /// Attach a sink that receives the finished result at end time.
    #[must_use]
    pub fn with_sink(mut self, sink: impl ResultSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    #[must_use]
    pub fn with_meta(mut self, meta: SessionMeta) -> Self {
        self.meta = meta;
        self
    }

    #[must_use]
    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    /// Capture the start snapshot and open the measurement window.
    ///
    /// Valid only before the session has been started. When the fetch
    /// fails, the session stays unstarted and the error is returned; the
    /// caller decides whether that is fatal to the surrounding work.
    pub async fn start(&mut self) -> Result<()> {
        match self.state {
            State::NotStarted => {}
            State::Started { .. } => bail!("session already started"),
            State::Ended => bail!("session already ended"),
        }

        let snapshot = self.source.fetch().await?;
        log::debug!(target: LOG_TARGET, "Captured start snapshot with {} series", snapshot.len());

        self.state = State::Started {
            snapshot,
            at: Utc::now(),
        };
        Ok(())
    }

    /// Capture the end snapshot, evaluate deltas, and emit the result.
    ///
    /// Valid only from the started state; ending before starting fails
    /// without ever touching the snapshot source. A fetch failure leaves
    /// the session started and produces no result. Once the second
    /// snapshot is in hand the session is ended for good: a sink failure
    /// is reported in the [`Completion`] next to the retained result
    /// rather than in place of it.
    pub async fn end(&mut self) -> Result<Completion> {
        let (start_snapshot, start_time) = match mem::replace(&mut self.state, State::Ended) {
            State::NotStarted => {
                self.state = State::NotStarted;
                bail!("start() must be called before end()");
            }
            State::Ended => bail!("session already ended"),
            State::Started { snapshot, at } => (snapshot, at),
        };

        let end_snapshot = match self.source.fetch().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.state = State::Started {
                    snapshot: start_snapshot,
                    at: start_time,
                };
                return Err(e);
            }
        };
        let end_time = Utc::now();

        log::debug!(target: LOG_TARGET, "Captured end snapshot with {} series", end_snapshot.len());

        let evaluation = evaluate(&self.defs, &self.policy, &start_snapshot, &end_snapshot);
        log::debug!(
            target: LOG_TARGET,
            "Evaluated {} definitions: {} measured, {} skipped",
            self.defs.len(),
            evaluation.measurements.len(),
            evaluation.skipped.len()
        );

        let result = SessionResult {
            meta: self.meta.clone(),
            labels: self.labels.clone(),
            start_time,
            end_time,
            measurements: evaluation.measurements,
            skipped: evaluation.skipped,
            warnings: evaluation.warnings,
            errors: evaluation.errors,
        };

        let sink_error = match &self.sink {
            Some(sink) => sink.save(&result).err(),
            None => None,
        };
        if let Some(e) = &sink_error {
            log::warn!(target: LOG_TARGET, "Could not persist session result: {e}");
        }

        Ok(Completion { result, sink_error })
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("defs", &self.defs)
            .field("policy", &self.policy)
            .field("has_sink", &self.sink.is_some())
            .field("meta", &self.meta)
            .field("labels", &self.labels)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
