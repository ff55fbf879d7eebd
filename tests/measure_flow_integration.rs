//! End-to-end tests of the measurement flow: configuration to artifact on disk

use camino::Utf8PathBuf;
use ohno::app_err;
use slometer::Result;
use slometer::config::Config;
use slometer::harness::{configured_session, run_measured};
use slometer::metrics::{EvaluationPolicy, MetricDef, MetricScope, ParallelGlobalRule};
use slometer::probe::FileSource;
use slometer::session::{RunLabel, SessionMeta};
use std::fs;

const BEFORE_EXPOSITION: &str = "controller_runtime_reconcile_total 100\nwidget_requests_total 40\n";
const AFTER_EXPOSITION: &str = "controller_runtime_reconcile_total 117\nwidget_requests_total 42\n";

/// Working directory with an exposition file the work can rewrite
struct Fixture {
    _dir: tempfile::TempDir,
    root: Utf8PathBuf,
    exposition: Utf8PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("Temp dir path should be UTF-8");
        let exposition = root.join("metrics.txt");
        fs::write(&exposition, BEFORE_EXPOSITION).expect("Failed to seed exposition file");
        Self {
            _dir: dir,
            root,
            exposition,
        }
    }

    fn config(&self) -> Config {
        Config {
            enabled: true,
            artifacts_dir: self.root.clone(),
            run_id: "run-7".to_string(),
            metrics: vec![
                MetricDef::new("controller_runtime_reconcile_total", MetricScope::Global),
                MetricDef::new("widget_requests_total", MetricScope::Scoped),
            ],
            ..Config::default()
        }
    }

    fn meta(&self) -> SessionMeta {
        SessionMeta {
            method: "run".to_string(),
            run_id: "run-7".to_string(),
            suite: "smoke".to_string(),
            test_case: "create-widget".to_string(),
            ..SessionMeta::default()
        }
    }

    fn advance_metrics(&self) -> Result<()> {
        fs::write(&self.exposition, AFTER_EXPOSITION)?;
        Ok(())
    }
}

#[tokio::test]
async fn test_successful_run_produces_a_readable_artifact() {
    let fixture = Fixture::new();
    let config = fixture.config();

    // The work itself advances the counters mid-window
    let session = configured_session(&config, FileSource::new(fixture.exposition.clone()), fixture.meta());
    let run = run_measured(session, async { fixture.advance_metrics() }).await;

    assert!(run.outcome.is_ok());
    assert_eq!(run.label, RunLabel::Success);
    assert!(run.measurement_errors.is_empty());

    let result = run.result.expect("A measurement should have been produced");
    assert!((result.measurements["controller_runtime_reconcile_total"] - 17.0).abs() < 1e-9);
    assert!((result.measurements["widget_requests_total"] - 2.0).abs() < 1e-9);

    // The artifact on disk carries the same content
    let artifact = config.artifact_path("create-widget");
    assert_eq!(artifact.file_name(), Some("sli-summary.run-7.create-widget.json"));

    let text = fs::read_to_string(&artifact).expect("Artifact should exist");
    let value: serde_json::Value = serde_json::from_str(&text).expect("Artifact should be valid JSON");
    assert_eq!(value["meta"]["method"], "run");
    assert_eq!(value["meta"]["test_case"], "create-widget");
    assert_eq!(value["labels"]["suite"], "smoke");
    assert_eq!(value["labels"]["run_id"], "run-7");
    assert!((value["measurements"]["widget_requests_total"].as_f64().unwrap() - 2.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_failed_work_is_labeled_fail_but_still_measured() {
    let fixture = Fixture::new();
    let config = fixture.config();

    let session = configured_session(&config, FileSource::new(fixture.exposition.clone()), fixture.meta());
    let run: slometer::harness::MeasuredRun<()> = run_measured(session, async {
        fixture.advance_metrics()?;
        Err(app_err!("test case failed"))
    })
    .await;

    assert!(run.outcome.unwrap_err().to_string().contains("test case failed"));
    assert_eq!(run.label, RunLabel::Fail);

    // The measurement window still closed and was persisted
    let result = run.result.expect("A measurement should have been produced");
    assert!((result.measurements["controller_runtime_reconcile_total"] - 17.0).abs() < 1e-9);
    assert!(config.artifact_path("create-widget").as_std_path().exists());
}

#[tokio::test]
async fn test_parallel_skip_policy_downgrades_the_run() {
    let fixture = Fixture::new();
    let config = Config {
        policy: EvaluationPolicy::new(true, ParallelGlobalRule::Skip),
        ..fixture.config()
    };

    let session = configured_session(&config, FileSource::new(fixture.exposition.clone()), fixture.meta());
    let run = run_measured(session, async { fixture.advance_metrics() }).await;

    // The work passed, but the global series was dropped from the window
    assert!(run.outcome.is_ok());
    assert_eq!(run.label, RunLabel::Skip);

    let result = run.result.expect("A measurement should have been produced");
    assert_eq!(
        result.skipped.get("controller_runtime_reconcile_total").map(String::as_str),
        Some("global metric in parallel mode")
    );
    assert!(!result.measurements.contains_key("controller_runtime_reconcile_total"));
    assert!((result.measurements["widget_requests_total"] - 2.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_counter_reset_downgrades_the_run() {
    let fixture = Fixture::new();
    let config = fixture.config();

    let session = configured_session(&config, FileSource::new(fixture.exposition.clone()), fixture.meta());
    let run = run_measured(session, async {
        // A restarted process starts its counters over
        fs::write(&fixture.exposition, "controller_runtime_reconcile_total 3\nwidget_requests_total 1\n")?;
        Ok(())
    })
    .await;

    assert!(run.outcome.is_ok());
    assert_eq!(run.label, RunLabel::Skip);

    // Negative deltas are reported as-is, they just cannot count as success
    let result = run.result.expect("A measurement should have been produced");
    assert!((result.measurements["controller_runtime_reconcile_total"] - -97.0).abs() < 1e-9);
    assert!(!result.is_complete());
}

#[tokio::test]
async fn test_disabled_configuration_runs_unmeasured() {
    let fixture = Fixture::new();
    let config = Config {
        enabled: false,
        ..fixture.config()
    };

    let session = configured_session(&config, FileSource::new(fixture.exposition.clone()), fixture.meta());
    assert!(session.is_none());

    let run = run_measured(session, async { Ok(()) }).await;
    assert!(run.outcome.is_ok());
    assert_eq!(run.label, RunLabel::Skip);
    assert!(run.result.is_none());
    assert!(!config.artifact_path("create-widget").as_std_path().exists());
}
