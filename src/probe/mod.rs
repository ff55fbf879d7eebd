//! Snapshot sources: where metrics exposition text comes from
//!
//! A [`Session`] is deliberately ignorant of how exposition text is
//! obtained; it only calls [`SnapshotSource::fetch`], once at start and once
//! at end. This module defines that seam and ships the three sources the
//! tool uses: an HTTP endpoint, a child process printing to stdout, and a
//! plain file. Each fetch re-reads its origin, so two calls against a
//! changing origin yield two distinct snapshots.
//!
//! Sources own their operational concerns (timeouts, authentication); the
//! session imposes none of its own.
//!
//! [`Session`]: crate::session::Session

mod command;
mod file;
mod http;
mod source;

pub use command::CommandSource;
pub use file::FileSource;
pub use http::HttpSource;
pub use source::SnapshotSource;
