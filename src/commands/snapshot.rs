use super::common::{Common, CommonArgs};
use camino::Utf8PathBuf;
use clap::Parser;
use core::fmt::Write;
use ohno::IntoAppError;
use slometer::Result;
use std::fs;

#[derive(Parser, Debug)]
pub struct SnapshotArgs {
    /// Only show series named by the configured metrics
    #[arg(long)]
    pub tracked_only: bool,

    /// Write the snapshot to a file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub output: Option<Utf8PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Capture one snapshot and print or save its series.
///
/// Output is exposition-shaped (`name value` per line, sorted by name), so
/// a saved snapshot can be fed back into the `diff` subcommand.
pub async fn capture_snapshot(args: &SnapshotArgs) -> Result<()> {
    let common = Common::new(&args.common)?;
    let mut source = common.source(&args.common)?;
    let snapshot = source.fetch().await?;

    let mut text = String::new();
    let mut count = 0_usize;
    for (name, value) in snapshot.iter() {
        if args.tracked_only && !common.config.metrics.iter().any(|def| def.name == name) {
            continue;
        }

        writeln!(text, "{name} {value}")?;
        count += 1;
    }

    match &args.output {
        Some(path) => {
            fs::write(path, &text).into_app_err_with(|| format!("writing snapshot to '{path}'"))?;
            println!("Wrote {count} series to '{path}'");
        }
        None => print!("{text}"),
    }

    Ok(())
}
