//! Configuration for the measurement tool.
//!
//! Configuration is read from a `slometer.toml`, `slometer.yml`,
//! `slometer.yaml`, or `slometer.json` file in the working directory, or
//! from an explicit path. Every field has a default, and a missing file is
//! not an error: the tool runs disabled until configuration turns it on.

#[expect(clippy::module_inception, reason = "Module is named after the type it defines")]
mod config;

pub use config::Config;
