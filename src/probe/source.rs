use crate::Result;
use crate::metrics::Snapshot;
use async_trait::async_trait;
use core::fmt::Debug;

/// Supplies point-in-time captures of a metrics exposition.
///
/// A session invokes this exactly twice over its lifetime. Implementations
/// take `&mut self` so they may keep connections or other per-fetch state.
#[async_trait]
pub trait SnapshotSource: Send + Sync + Debug {
    /// Capture a snapshot of the exposition as it is right now.
    async fn fetch(&mut self) -> Result<Snapshot>;
}

#[async_trait]
impl SnapshotSource for Box<dyn SnapshotSource> {
    async fn fetch(&mut self) -> Result<Snapshot> {
        (**self).fetch().await
    }
}
