use crate::Result;
use crate::session::SessionResult;

/// Receives finished session results for persistence.
pub trait ResultSink: Send + Sync {
    /// Persist one result. Failures are surfaced to the session's caller
    /// alongside the result itself, never in place of it.
    fn save(&self, result: &SessionResult) -> Result<()>;
}
