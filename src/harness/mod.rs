//! Running a unit of work inside a measurement session.
//!
//! The harness owns the "measure around work" choreography so callers do
//! not hand-roll it: open a session when measurement is enabled, run the
//! work, close the session, and classify what happened.
//!
//! # Implementation Model
//!
//! Measurement trouble is second-class here. A failed snapshot fetch or a
//! rejected artifact never fails the work itself; it is logged, recorded on
//! the [`MeasuredRun`], and reflected in the run's label. Only the work's
//! own outcome decides success or failure of the run.

mod measured_run;

pub use measured_run::{MeasuredRun, configured_session, run_measured};
