//! A tool to measure before/after metric deltas around a unit of work.
//!
//! # Overview
//!
//! `slometer` wraps a bounded unit of work, like one end-to-end test case,
//! in a measurement session. It captures a snapshot of counter-like metrics
//! just before the work starts, another just after it finishes, and reports
//! the per-series deltas. The result answers questions like "how many
//! reconciles did this one test cost" without standing up a full metrics
//! pipeline, and feeds SLO-style reporting in CI.
//!
//! Snapshots come from any Prometheus-style text exposition: an HTTP
//! endpoint, a file, or the standard output of a command.
//!
//! # Installation
//!
//! ```bash
//! cargo install slometer
//! ```
//!
//! # Quick Start
//!
//! Measure a test run against a local metrics endpoint:
//!
//! ```bash
//! slometer init                  # generate slometer.toml
//! # edit slometer.toml: set enabled = true and the series to track
//! slometer run --metrics-url http://localhost:9090/metrics make e2e
//! ```
//!
//! This runs `make e2e`, measures the configured series around it, prints a
//! summary, and writes a JSON artifact under the artifacts directory.
//!
//! # Subcommands
//!
//! ## run
//!
//! Execute a command as the measured unit of work:
//!
//! ```bash
//! slometer run --metrics-url http://localhost:9090/metrics ./test.sh --flag
//! ```
//!
//! The command inherits stdin/stdout/stderr and always runs to completion.
//! `slometer run` exits with failure exactly when the command does;
//! measurement trouble never changes the exit status, it only shows up in
//! the summary and on stderr.
//!
//! Identify the run for reporting:
//!
//! ```bash
//! slometer run \
//!   --run-id "$CI_PIPELINE_ID" \
//!   --test-case create-widget \
//!   --suite smoke \
//!   --metrics-url http://localhost:9090/metrics \
//!   ./test.sh
//! ```
//!
//! ## snapshot
//!
//! Capture one snapshot and print its series, sorted by name:
//!
//! ```bash
//! slometer snapshot --metrics-url http://localhost:9090/metrics
//! slometer snapshot --metrics-file /tmp/metrics.txt --tracked-only
//! slometer snapshot --metrics-command "kubectl get --raw /metrics" --output before.txt
//! ```
//!
//! Output is exposition-shaped (`name value` per line), so saved snapshots
//! can be compared later with `diff`.
//!
//! ## diff
//!
//! Evaluate tracked deltas between two saved exposition files:
//!
//! ```bash
//! slometer snapshot --metrics-url http://localhost:9090/metrics --output before.txt
//! make e2e
//! slometer snapshot --metrics-url http://localhost:9090/metrics --output after.txt
//! slometer diff before.txt after.txt
//! ```
//!
//! ## init
//!
//! Generate a default configuration file:
//!
//! ```bash
//! slometer init                  # writes slometer.toml
//! slometer init custom.yaml     # format follows the extension
//! ```
//!
//! # Metrics Sources
//!
//! Every subcommand that needs a snapshot accepts exactly one source:
//!
//! - `--metrics-url URL`: GET the URL and parse the response body. Use
//!   `--token` (or the `SLOMETER_TOKEN` environment variable) to send a
//!   bearer token.
//! - `--metrics-file PATH`: read the file. It is re-read for every
//!   snapshot, so a file refreshed between start and end works.
//! - `--metrics-command CMD`: run the command through `sh -c` and parse its
//!   standard output.
//!
//! URL and command fetches are bounded by `fetch_timeout_secs` from the
//! configuration.
//!
//! # Configuration
//!
//! ## File Discovery
//!
//! Configuration is read from the first of `slometer.toml`,
//! `slometer.yml`, `slometer.yaml`, or `slometer.json` found in the
//! working directory, or from an explicit `--config PATH`. A missing file
//! is not an error: every field has a default, and measurement stays
//! disabled until a configuration enables it.
//!
//! ## Structure
//!
//! ```toml
//! # Turn measurement on. With enabled = false (the default), `slometer run`
//! # just runs the command.
//! enabled = true
//!
//! # Where result artifacts land.
//! artifacts_dir = "/tmp"
//!
//! # Artifact file name when no run identity is configured.
//! artifact_name = "sli-summary.json"
//!
//! # Folded into artifact names; usually set per run with --run-id.
//! run_id = ""
//!
//! # Upper bound in seconds on a single snapshot fetch.
//! fetch_timeout_secs = 120
//!
//! # Series to track. A bare metric name matches the sum over all label
//! # variants; a full identity like 'foo_total{pod="a"}' matches one series.
//! [[metrics]]
//! name = "controller_runtime_reconcile_total"
//! scope = "global"
//!
//! [[metrics]]
//! name = "widget_requests_total"
//! scope = "scoped"
//!
//! # How globally scoped series are treated when sessions run in parallel.
//! [policy]
//! allow_parallel = false
//! on_global_in_parallel = "warn"    # skip | warn | fail
//!
//! # Extra labels stamped onto every session result.
//! [labels]
//! cluster = "kind-ci"
//! ```
//!
//! ## Metric Scopes and Parallel Runs
//!
//! A `global` series reflects state shared across everything running on the
//! target system, so when several sessions run in parallel its delta cannot
//! be attributed to one of them. `on_global_in_parallel` decides what
//! happens to global series while `allow_parallel` is true:
//!
//! - `skip`: drop the series from measurements, recording why
//! - `warn`: measure anyway and append a warning (the default)
//! - `fail`: record a non-fatal error instead of a measurement
//!
//! With `allow_parallel = false` the policy has no effect. An unrecognized
//! value behaves like `warn` and adds a diagnostic warning naming it.
//!
//! # Run Labels
//!
//! Every measured run gets one label in the summary and artifact:
//!
//! - `success`: the work passed and every tracked series produced a usable
//!   delta
//! - `fail`: the work itself failed, regardless of measurement quality
//! - `skip`: the work passed but the measurement is unusable (a snapshot
//!   fetch failed, a series went missing, or a counter reset mid-window)
//!
//! # Artifacts
//!
//! Results are written as pretty-printed JSON. With both a run id and a
//! test case available the file is named
//! `sli-summary.<run-id>.<test-case>.json`; otherwise `artifact_name` is
//! used. Writes go through a temp file and a rename, so a crash never
//! leaves a torn artifact.
//!
//! ```json
//! {
//!   "meta": { "method": "run", "run_id": "1234", "test_case": "create-widget", ... },
//!   "labels": { "cluster": "kind-ci", "run_id": "1234", ... },
//!   "start_time": "2026-01-01T12:00:00Z",
//!   "end_time": "2026-01-01T12:00:30Z",
//!   "measurements": { "controller_runtime_reconcile_total": 17.0 },
//!   "skipped": {},
//!   "warnings": [],
//!   "errors": []
//! }
//! ```
//!
//! # CI/CD Integration
//!
//! ```yaml
//! - name: Measure e2e cost
//!   env:
//!     SLOMETER_TOKEN: ${{ secrets.METRICS_TOKEN }}
//!   run: |
//!     slometer run \
//!       --run-id "${{ github.run_id }}" \
//!       --test-case e2e-suite \
//!       --metrics-url https://prometheus.ci.example.com/metrics \
//!       make e2e
//!
//! - name: Upload measurement artifacts
//!   uses: actions/upload-artifact@v4
//!   if: always()
//!   with:
//!     name: sli-artifacts
//!     path: /tmp/sli-summary.*.json
//! ```
//!
//! # Troubleshooting
//!
//! ## Every series shows `metric missing`
//!
//! The configured name must match a snapshot key exactly. Check the raw
//! exposition with `slometer snapshot` and remember that a bare name only
//! exists when the endpoint exposes that series (or labeled variants of
//! it, which are summed under the bare name).
//!
//! ## Negative deltas
//!
//! A counter that resets between the two snapshots (typically because the
//! serving process restarted) produces a negative delta. The delta is
//! reported as-is but the run is labeled `skip`, since the measurement
//! cannot stand in a report.
//!
//! ## Runs are labeled `skip` with nothing obviously wrong
//!
//! Run with `--log-level debug` to see each fetch, parse, and evaluation
//! step, and check the artifact's `skipped`, `warnings`, and `errors`
//! fields.

use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};
use slometer::Result;

mod commands;

use crate::commands::{DiffArgs, InitArgs, RunArgs, SnapshotArgs, capture_snapshot, diff_snapshots, init_config, measure_command};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "slometer", version, about)]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: SloSubcommand,
}

#[derive(Subcommand, Debug)]
enum SloSubcommand {
    /// Run a command as the measured unit of work
    Run(Box<RunArgs>),
    /// Capture one snapshot from the metrics source
    Snapshot(Box<SnapshotArgs>),
    /// Evaluate tracked deltas between two exposition files
    Diff(Box<DiffArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        SloSubcommand::Run(run_args) => measure_command(run_args).await,
        SloSubcommand::Snapshot(snapshot_args) => capture_snapshot(snapshot_args).await,
        SloSubcommand::Diff(diff_args) => diff_snapshots(diff_args),
        SloSubcommand::Init(init_args) => init_config(init_args),
    }
}
