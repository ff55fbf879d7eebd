use crate::Result;
use crate::metrics::Snapshot;
use crate::probe::source::SnapshotSource;
use async_trait::async_trait;
use camino::Utf8PathBuf;
use ohno::IntoAppError;
use std::fs;

const LOG_TARGET: &str = "      file";

/// Fetches exposition text from a file on disk.
///
/// The file is re-read on every fetch, so a path that is rewritten between
/// the start and end of a session yields two distinct snapshots.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: Utf8PathBuf,
}

impl FileSource {
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    async fn fetch(&mut self) -> Result<Snapshot> {
        log::debug!(target: LOG_TARGET, "Reading metrics file '{}'", self.path);

        let text = fs::read_to_string(&self.path).into_app_err_with(|| format!("reading metrics file '{}'", self.path))?;
        Ok(Snapshot::parse(&text))
    }
}
