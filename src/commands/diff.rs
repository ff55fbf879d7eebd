use super::common::{Common, CommonArgs};
use camino::Utf8PathBuf;
use clap::Parser;
use core::fmt::Write;
use ohno::IntoAppError;
use slometer::Result;
use slometer::metrics::{Snapshot, evaluate};
use std::fs;

#[derive(Parser, Debug)]
pub struct DiffArgs {
    /// Exposition file captured before the work
    #[arg(value_name = "BEFORE")]
    pub before: Utf8PathBuf,

    /// Exposition file captured after the work
    #[arg(value_name = "AFTER")]
    pub after: Utf8PathBuf,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Evaluate tracked deltas between two saved exposition files.
///
/// The same tracked definitions and parallel-execution policy apply as in
/// a live session, so the printed deltas match what a `run` over the same
/// window would have measured.
pub fn diff_snapshots(args: &DiffArgs) -> Result<()> {
    let common = Common::new(&args.common)?;

    let before_text = fs::read_to_string(&args.before).into_app_err_with(|| format!("reading exposition file '{}'", args.before))?;
    let after_text = fs::read_to_string(&args.after).into_app_err_with(|| format!("reading exposition file '{}'", args.after))?;

    let before = Snapshot::parse(&before_text);
    let after = Snapshot::parse(&after_text);
    let evaluation = evaluate(&common.config.metrics, &common.config.policy, &before, &after);

    let mut out = String::new();
    let width = evaluation
        .measurements
        .keys()
        .chain(evaluation.skipped.keys())
        .map(String::len)
        .max()
        .unwrap_or(0);

    for (name, delta) in &evaluation.measurements {
        writeln!(out, "{name:<width$}  {delta}")?;
    }

    for (name, reason) in &evaluation.skipped {
        writeln!(out, "{name:<width$}  skipped: {reason}")?;
    }

    for warning in &evaluation.warnings {
        writeln!(out, "warning: {warning}")?;
    }

    for error in &evaluation.errors {
        writeln!(out, "error: {error}")?;
    }

    print!("{out}");
    Ok(())
}
