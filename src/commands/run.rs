use super::common::{Common, CommonArgs};
use super::report;
use clap::Parser;
use ohno::{IntoAppError, bail};
use slometer::Result;
use slometer::harness::{configured_session, run_measured};
use slometer::misc::first_non_blank;
use slometer::session::SessionMeta;
use tokio::process::Command;

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Command to run as the measured unit of work
    #[arg(value_name = "COMMAND", required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,

    /// Name identifying the measured test case [default: the command name]
    #[arg(long, value_name = "NAME")]
    pub test_case: Option<String>,

    /// Name of the suite the test case belongs to
    #[arg(long, value_name = "NAME")]
    pub suite: Option<String>,

    /// Namespace or environment the work runs against
    #[arg(long, value_name = "NAME")]
    pub namespace: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Run a command as the measured unit of work.
///
/// The command inherits stdio and runs to completion whether or not
/// measurement succeeds. The exit status of this subcommand follows the
/// child's exit status alone; measurement trouble only shows up in the
/// printed summary and on stderr.
pub async fn measure_command(args: &RunArgs) -> Result<()> {
    let common = Common::new(&args.common)?;

    let Some((program, program_args)) = args.command.split_first() else {
        bail!("no command given to run");
    };

    let test_case = first_non_blank(args.test_case.as_deref().unwrap_or_default(), program).to_string();
    let meta = SessionMeta {
        method: "run".to_string(),
        run_id: common.config.run_id.clone(),
        suite: args.suite.clone().unwrap_or_default(),
        test_case,
        namespace: args.namespace.clone().unwrap_or_default(),
        ..SessionMeta::default()
    };

    let session = if common.config.enabled {
        let source = common.source(&args.common)?;
        configured_session(&common.config, source, meta)
    } else {
        None
    };

    let work = async {
        let status = Command::new(program)
            .args(program_args)
            .status()
            .await
            .into_app_err_with(|| format!("running command '{program}'"))?;

        if !status.success() {
            bail!("command '{program}' exited with {status}");
        }

        Ok(())
    };

    let measured = run_measured(session, work).await;

    let mut summary = String::new();
    let _ = report::generate(measured.label, measured.result.as_ref(), common.color, &mut summary);
    print!("{summary}");

    for e in &measured.measurement_errors {
        eprintln!("⚠️  Measurement: {e}");
    }

    measured.outcome
}
