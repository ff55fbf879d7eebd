use crate::Result;
use crate::session::SessionResult;
use crate::sink::sink::ResultSink;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use ohno::IntoAppError;
use std::fs;
use std::fs::File;
use std::io::{BufWriter, Write};

const LOG_TARGET: &str = "      sink";

/// Writes each result as a pretty-printed JSON artifact.
///
/// The artifact is written to `<path>.tmp.<suffix>` first, flushed, and
/// renamed over the destination, so an existing artifact is replaced
/// atomically or not at all. Missing parent directories are created. An
/// empty path disables the sink: saving becomes a successful no-op.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: Utf8PathBuf,
}

impl JsonFileSink {
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn write_pretty(result: &SessionResult, path: &Utf8Path) -> Result<()> {
        let file = File::create(path).into_app_err_with(|| format!("creating artifact file '{path}'"))?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, result).into_app_err_with(|| format!("writing session result to '{path}'"))?;
        writer.flush().into_app_err_with(|| format!("flushing artifact file '{path}'"))?;
        Ok(())
    }
}

impl ResultSink for JsonFileSink {
    fn save(&self, result: &SessionResult) -> Result<()> {
        if self.path.as_str().is_empty() {
            log::debug!(target: LOG_TARGET, "No artifact path configured, skipping persistence");
            return Ok(());
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_str().is_empty()
        {
            fs::create_dir_all(parent).into_app_err_with(|| format!("creating artifact directory '{parent}'"))?;
        }

        let suffix = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let tmp_path = Utf8PathBuf::from(format!("{}.tmp.{suffix}", self.path));

        if let Err(e) = Self::write_pretty(result, &tmp_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e).into_app_err_with(|| format!("renaming '{tmp_path}' to '{}'", self.path));
        }

        log::debug!(target: LOG_TARGET, "Wrote session result to '{}'", self.path);
        Ok(())
    }
}
