use crate::Result;
use crate::config::Config;
use crate::probe::SnapshotSource;
use crate::session::{RunLabel, Session, SessionMeta, SessionResult};
use crate::sink::JsonFileSink;
use core::future::Future;

const LOG_TARGET: &str = "   harness";

/// Everything one measured unit of work produced.
#[derive(Debug)]
pub struct MeasuredRun<T> {
    /// What the work itself returned.
    pub outcome: Result<T>,

    /// How the run counts in SLO reporting.
    pub label: RunLabel,

    /// The finished session result, when one was produced.
    pub result: Option<SessionResult>,

    /// Measurement failures encountered along the way. These never affect
    /// `outcome`.
    pub measurement_errors: Vec<ohno::AppError>,
}

/// Build a session for one unit of work from configuration.
///
/// Returns `None` when measurement is disabled. Labels from configuration
/// are merged with the ones derived from `meta`, with meta winning on
/// conflicts, and the session persists its result under the configured
/// artifacts directory.
#[must_use]
pub fn configured_session(config: &Config, source: impl SnapshotSource + 'static, meta: SessionMeta) -> Option<Session> {
    if !config.enabled {
        log::debug!(target: LOG_TARGET, "Measurement is disabled, not opening a session");
        return None;
    }

    let artifact = config.artifact_path(&meta.test_case);
    let mut labels = config.labels.clone();
    labels.extend(meta.to_labels());

    Some(
        Session::new(source, config.metrics.clone(), config.policy.clone())
            .with_sink(JsonFileSink::new(artifact))
            .with_meta(meta)
            .with_labels(labels),
    )
}

/// Run `work` inside `session`, if one is given.
///
/// The session is started best-effort before the work and ended best-effort
/// after it. A start failure skips the end call entirely; an end failure
/// just means no result was produced. Either way the work runs to
/// completion and its outcome is returned untouched.
pub async fn run_measured<T, F>(mut session: Option<Session>, work: F) -> MeasuredRun<T>
where
    F: Future<Output = Result<T>>,
{
    let mut measurement_errors = Vec::new();
    let mut result = None;

    let started = match &mut session {
        Some(session) => match session.start().await {
            Ok(()) => true,
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Could not start measurement session: {e}");
                measurement_errors.push(e);
                false
            }
        },
        None => false,
    };

    let outcome = work.await;

    if started && let Some(session) = &mut session {
        match session.end().await {
            Ok(completion) => {
                if let Some(e) = completion.sink_error {
                    measurement_errors.push(e);
                }
                result = Some(completion.result);
            }
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Could not end measurement session: {e}");
                measurement_errors.push(e);
            }
        }
    }

    let label = RunLabel::classify(outcome.is_ok(), result.as_ref());
    MeasuredRun {
        outcome,
        label,
        result,
        measurement_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{EvaluationPolicy, MetricDef, MetricScope, Snapshot};
    use async_trait::async_trait;
    use camino::Utf8PathBuf;
    use ohno::app_err;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct FakeSource {
        responses: VecDeque<Result<Snapshot>>,
        fetches: Arc<AtomicUsize>,
    }

    impl FakeSource {
        fn new(responses: Vec<Result<Snapshot>>) -> (Self, Arc<AtomicUsize>) {
            let fetches = Arc::new(AtomicUsize::new(0));
            let source = Self {
                responses: responses.into_iter().collect(),
                fetches: Arc::clone(&fetches),
            };
            (source, fetches)
        }
    }

    #[async_trait]
    impl SnapshotSource for FakeSource {
        async fn fetch(&mut self) -> Result<Snapshot> {
            let _ = self.fetches.fetch_add(1, Ordering::SeqCst);
            self.responses.pop_front().unwrap_or_else(|| Err(app_err!("fake source exhausted")))
        }
    }

    fn counter(value: f64) -> Snapshot {
        Snapshot::parse(&format!("widget_total {value}"))
    }

    fn plain_session(responses: Vec<Result<Snapshot>>) -> (Session, Arc<AtomicUsize>) {
        let (source, fetches) = FakeSource::new(responses);
        let defs = vec![MetricDef::new("widget_total", MetricScope::Scoped)];
        (Session::new(source, defs, EvaluationPolicy::default()), fetches)
    }

    #[tokio::test]
    async fn test_no_session_still_runs_the_work() {
        let run = run_measured(None, async { Ok(42) }).await;

        assert_eq!(run.outcome.unwrap(), 42);
        assert_eq!(run.label, RunLabel::Skip);
        assert!(run.result.is_none());
        assert!(run.measurement_errors.is_empty());
    }

    #[tokio::test]
    async fn test_measured_success() {
        let (session, _) = plain_session(vec![Ok(counter(10.0)), Ok(counter(13.0))]);

        let run = run_measured(Some(session), async { Ok(()) }).await;

        assert!(run.outcome.is_ok());
        assert_eq!(run.label, RunLabel::Success);
        let result = run.result.unwrap();
        assert!((result.measurements["widget_total"] - 3.0).abs() < 1e-9);
        assert!(run.measurement_errors.is_empty());
    }

    #[tokio::test]
    async fn test_work_failure_dominates_the_label() {
        let (session, _) = plain_session(vec![Ok(counter(10.0)), Ok(counter(13.0))]);

        let run: MeasuredRun<()> = run_measured(Some(session), async { Err(app_err!("work exploded")) }).await;

        assert!(run.outcome.unwrap_err().to_string().contains("work exploded"));
        assert_eq!(run.label, RunLabel::Fail);

        // The measurement itself still completed.
        assert!(run.result.is_some());
    }

    #[tokio::test]
    async fn test_start_failure_never_fails_the_work() {
        let (session, fetches) = plain_session(vec![Err(app_err!("endpoint down"))]);

        let run = run_measured(Some(session), async { Ok("done") }).await;

        assert_eq!(run.outcome.unwrap(), "done");
        assert_eq!(run.label, RunLabel::Skip);
        assert!(run.result.is_none());
        assert_eq!(run.measurement_errors.len(), 1);

        // Without a start snapshot there is nothing to end.
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_end_failure_is_recorded_not_returned() {
        let (session, fetches) = plain_session(vec![Ok(counter(10.0)), Err(app_err!("scrape failed"))]);

        let run = run_measured(Some(session), async { Ok(()) }).await;

        assert!(run.outcome.is_ok());
        assert_eq!(run.label, RunLabel::Skip);
        assert!(run.result.is_none());
        assert_eq!(run.measurement_errors.len(), 1);
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_configured_session_is_none_when_disabled() {
        let (source, _) = FakeSource::new(Vec::new());

        let session = configured_session(&Config::default(), source, SessionMeta::default());
        assert!(session.is_none());
    }

    #[tokio::test]
    async fn test_configured_session_measures_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            enabled: true,
            artifacts_dir: Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap(),
            run_id: "r1".to_string(),
            metrics: vec![MetricDef::new("widget_total", MetricScope::Scoped)],
            ..Config::default()
        };
        let meta = SessionMeta {
            run_id: config.run_id.clone(),
            test_case: "create-widget".to_string(),
            ..SessionMeta::default()
        };

        let (source, _) = FakeSource::new(vec![Ok(counter(1.0)), Ok(counter(4.0))]);
        let session = configured_session(&config, source, meta).unwrap();

        let run = run_measured(Some(session), async { Ok(()) }).await;

        assert_eq!(run.label, RunLabel::Success);
        let result = run.result.unwrap();
        assert!((result.measurements["widget_total"] - 3.0).abs() < 1e-9);
        assert_eq!(result.labels["test_case"], "create-widget");

        let artifact = config.artifact_path("create-widget");
        assert_eq!(artifact.file_name(), Some("sli-summary.r1.create-widget.json"));
        assert!(artifact.as_std_path().exists());
    }
}
