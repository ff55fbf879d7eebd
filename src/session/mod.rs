//! The measurement session state machine and its output record
//!
//! A [`Session`] wraps one bounded unit of work. Starting it captures a
//! snapshot of the metrics exposition; ending it captures a second snapshot,
//! evaluates the tracked definitions under the configured policy, and emits
//! an immutable [`SessionResult`] describing the window.
//!
//! # Implementation Model
//!
//! The session moves through `NotStarted`, `Started`, and the terminal
//! `Ended`. Start and end each invoke the snapshot source exactly once; a
//! fetch failure leaves the state unchanged so the caller decides what it
//! means for the surrounding work. Ending from `NotStarted` is a programming
//! error and fails without touching the source.
//!
//! Session-control failures (fetching, ending out of order, persisting) are
//! returned as errors. Measurement-quality issues never are: missing series,
//! policy skips, and policy warnings live inside the [`SessionResult`],
//! which is produced even when the sink rejects it. [`RunLabel::classify`]
//! folds the two concerns into the final `success`/`fail`/`skip` verdict,
//! where a failing unit of work always wins over measurement trouble.

mod label;
mod result;
#[expect(clippy::module_inception, reason = "Module is named after the type it defines")]
mod session;

pub use label::RunLabel;
pub use result::{Labels, SessionMeta, SessionResult};
pub use session::{Completion, Session};
