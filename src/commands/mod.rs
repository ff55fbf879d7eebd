//! Command-line interface for slometer
//!
//! This module implements the CLI commands and coordinates the library
//! crates to measure units of work, capture and compare snapshots, and
//! manage configuration.
//!
//! # Implementation Model
//!
//! The module is organized around four commands:
//!
//! - **run**: Execute a command as the measured unit of work, wrapping it
//!   in a measurement session and persisting the result artifact
//! - **snapshot**: Capture one snapshot from the selected metrics source
//!   and print or save its series
//! - **diff**: Evaluate tracked deltas between two saved exposition files
//! - **init**: Generate a default configuration file
//!
//! Commands that fetch share the same source selection (`--metrics-url`,
//! `--metrics-file`, or `--metrics-command`) and configuration handling.
//! The `common` module loads configuration, applies command-line
//! overrides, and builds the snapshot source; `report` renders session
//! results for the terminal.

mod common;
mod diff;
mod init;
mod report;
mod run;
mod snapshot;

pub use diff::{DiffArgs, diff_snapshots};
pub use init::{InitArgs, init_config};
pub use run::{RunArgs, measure_command};
pub use snapshot::{SnapshotArgs, capture_snapshot};
