use crate::Result;
use crate::metrics::Snapshot;
use crate::probe::source::SnapshotSource;
use async_trait::async_trait;
use core::time::Duration;
use ohno::{IntoAppError, bail};
use std::process::Stdio;
use tokio::process::Command;

const LOG_TARGET: &str = "   command";

/// Fetches exposition text by running a program and parsing its stdout.
///
/// Useful when the metrics endpoint is only reachable through a helper
/// (a port-forwarder, an in-cluster probe, a curl wrapper). The program is
/// re-run on every fetch.
#[derive(Debug, Clone)]
pub struct CommandSource {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandSource {
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }
}

#[async_trait]
impl SnapshotSource for CommandSource {
    async fn fetch(&mut self) -> Result<Snapshot> {
        log::debug!(target: LOG_TARGET, "Running metrics command '{}'", self.program);

        let child = Command::new(&self.program)
            .args(&self.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .into_app_err_with(|| format!("spawning metrics command '{}'", self.program))?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(e).into_app_err_with(|| format!("running metrics command '{}'", self.program)),
            Err(_) => {
                bail!("metrics command '{}' timed out after {} seconds", self.program, self.timeout.as_secs());
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("metrics command '{}' failed: {}", self.program, stderr.trim());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(Snapshot::parse(&stdout))
    }
}
