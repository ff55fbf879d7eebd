//! Persistence of finished session results
//!
//! The session hands every finished [`SessionResult`] to a [`ResultSink`];
//! what happens to it afterwards is entirely the sink's business. The
//! shipped implementation, [`JsonFileSink`], writes one pretty-printed JSON
//! artifact per result using a write-to-temp-then-rename sequence, so a
//! reader either sees the previous artifact or the complete new one and
//! never a torn write.
//!
//! [`SessionResult`]: crate::session::SessionResult

mod json_file;
#[expect(clippy::module_inception, reason = "Module is named after the trait it defines")]
mod sink;

pub use json_file::JsonFileSink;
pub use sink::ResultSink;
