//! Common argument handling shared between subcommands.

use camino::Utf8PathBuf;
use clap::Args;
use clap::ValueEnum;
use ohno::bail;
use slometer::Result;
use slometer::config::Config;
use slometer::misc::{ColorMode, parse_label};
use slometer::probe::{CommandSource, FileSource, HttpSource, SnapshotSource};
use url::Url;

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,
    /// Only error messages
    Error,
    /// Warning and error messages
    Warn,
    /// Info, warning, and error messages
    Info,
    /// Debug and above messages
    Debug,
    /// All messages including trace
    Trace,
}

fn parse_label_arg(s: &str) -> Result<(String, String), String> {
    parse_label(s).map_err(|e| e.to_string())
}

/// Common arguments shared between subcommands
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Prometheus-style metrics endpoint to snapshot
    #[arg(long, value_name = "URL", help_heading = "Metrics Source")]
    pub metrics_url: Option<Url>,

    /// File holding exposition text to snapshot
    #[arg(long, value_name = "PATH", help_heading = "Metrics Source")]
    pub metrics_file: Option<Utf8PathBuf>,

    /// Shell command whose standard output is exposition text
    #[arg(long, value_name = "CMD", help_heading = "Metrics Source")]
    pub metrics_command: Option<String>,

    /// Bearer token sent with every request to the metrics endpoint
    #[arg(long, value_name = "TOKEN", env = "SLOMETER_TOKEN", help_heading = "Metrics Source")]
    pub token: Option<String>,

    /// Path to configuration file [default: one of slometer.[toml|yml|yaml|json] ]
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Identifier of this CI run, folded into artifact file names
    #[arg(long, value_name = "ID")]
    pub run_id: Option<String>,

    /// Directory receiving result artifacts
    #[arg(long, value_name = "PATH")]
    pub artifacts_dir: Option<Utf8PathBuf>,

    /// Extra label attached to the session result (repeatable)
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_label_arg)]
    pub label: Vec<(String, String)>,

    /// Declare that other sessions may run concurrently with this one
    #[arg(long)]
    pub allow_parallel: bool,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    pub log_level: LogLevel,
}

pub struct Common {
    pub config: Config,
    pub color: ColorMode,
}

impl Common {
    /// Load configuration and fold in command-line overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded
    pub fn new(args: &CommonArgs) -> Result<Self> {
        Self::init_logging(args.log_level);

        let root = Utf8PathBuf::from(".");
        let (mut config, warnings) = Config::load(&root, args.config.as_ref())?;

        if let Some(run_id) = &args.run_id {
            config.run_id.clone_from(run_id);
        }

        if let Some(dir) = &args.artifacts_dir {
            config.artifacts_dir.clone_from(dir);
        }

        if args.allow_parallel {
            config.policy.allow_parallel = true;
        }

        for (key, value) in &args.label {
            let _ = config.labels.insert(key.clone(), value.clone());
        }

        // Print warnings if any
        if !warnings.is_empty() {
            eprintln!("\n⚠️  Configuration validation warnings:");
            for warning in &warnings {
                eprintln!("   {warning}");
            }
            eprintln!();
        }

        Ok(Self {
            config,
            color: args.color,
        })
    }

    /// Initialize logger based on log level
    fn init_logging(log_level: LogLevel) {
        if log_level == LogLevel::None {
            return;
        }

        let level = match log_level {
            LogLevel::None => return, // Already checked above, but being explicit
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };

        let env = env_logger::Env::default().filter_or("RUST_LOG", level);

        env_logger::Builder::from_env(env)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(matches!(log_level, LogLevel::Debug) || matches!(log_level, LogLevel::Trace))
            .init();
    }

    /// Build the snapshot source selected on the command line.
    ///
    /// Exactly one of the source flags must be given. The shell command
    /// variant runs through `sh -c` so pipelines work.
    pub fn source(&self, args: &CommonArgs) -> Result<Box<dyn SnapshotSource>> {
        let timeout = self.config.fetch_timeout();

        match (&args.metrics_url, &args.metrics_file, &args.metrics_command) {
            (Some(url), None, None) => Ok(Box::new(HttpSource::new(url.clone(), args.token.clone(), timeout)?)),
            (None, Some(path), None) => Ok(Box::new(FileSource::new(path.clone()))),
            (None, None, Some(command)) => Ok(Box::new(CommandSource::new(
                "sh",
                vec!["-c".to_string(), command.clone()],
                timeout,
            ))),
            (None, None, None) => bail!("one of --metrics-url, --metrics-file, or --metrics-command is required"),
            _ => bail!("--metrics-url, --metrics-file, and --metrics-command are mutually exclusive"),
        }
    }
}
