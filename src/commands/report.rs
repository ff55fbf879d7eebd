//! Terminal rendering of measured runs.

use chrono::SecondsFormat;
use core::fmt::{self, Write};
use owo_colors::OwoColorize;
use slometer::Result;
use slometer::misc::ColorMode;
use slometer::session::{RunLabel, SessionResult};

/// Render a run summary into `writer`.
pub fn generate<W: Write>(label: RunLabel, result: Option<&SessionResult>, color: ColorMode, writer: &mut W) -> Result<()> {
    let colors = ColorScheme::new(color);

    write!(writer, "Run label : ")?;
    colors.write_label(writer, label)?;
    writeln!(writer)?;

    let Some(result) = result else {
        writeln!(writer, "No measurement was produced for this run")?;
        return Ok(());
    };

    writeln!(
        writer,
        "Window    : {} .. {} ({}s)",
        result.start_time.to_rfc3339_opts(SecondsFormat::Secs, true),
        result.end_time.to_rfc3339_opts(SecondsFormat::Secs, true),
        result.elapsed().num_seconds(),
    )?;

    if !result.measurements.is_empty() {
        writeln!(writer)?;
        colors.write_bold(writer, "Measurements")?;
        writeln!(writer)?;

        let width = result.measurements.keys().map(String::len).max().unwrap_or(0);
        for (name, delta) in &result.measurements {
            writeln!(writer, "  {name:<width$}  {delta}")?;
        }
    }

    if !result.skipped.is_empty() {
        writeln!(writer)?;
        colors.write_bold(writer, "Skipped")?;
        writeln!(writer)?;

        let width = result.skipped.keys().map(String::len).max().unwrap_or(0);
        for (name, reason) in &result.skipped {
            writeln!(writer, "  {name:<width$}  {reason}")?;
        }
    }

    if !result.warnings.is_empty() {
        writeln!(writer)?;
        colors.write_bold(writer, "Warnings")?;
        writeln!(writer)?;

        for warning in &result.warnings {
            writeln!(writer, "  - {warning}")?;
        }
    }

    if !result.errors.is_empty() {
        writeln!(writer)?;
        colors.write_bold(writer, "Errors")?;
        writeln!(writer)?;

        for error in &result.errors {
            writeln!(writer, "  - {error}")?;
        }
    }

    Ok(())
}

struct ColorScheme {
    enabled: bool,
}

impl ColorScheme {
    fn new(mode: ColorMode) -> Self {
        Self { enabled: mode.is_enabled() }
    }

    fn write_bold<W: Write>(&self, writer: &mut W, text: &str) -> fmt::Result {
        if self.enabled {
            write!(writer, "{}", text.bold())
        } else {
            write!(writer, "{text}")
        }
    }

    fn write_label<W: Write>(&self, writer: &mut W, label: RunLabel) -> fmt::Result {
        if !self.enabled {
            return write!(writer, "{label}");
        }

        match label {
            RunLabel::Success => write!(writer, "{}", label.green()),
            RunLabel::Fail => write!(writer, "{}", label.red()),
            RunLabel::Skip => write!(writer, "{}", label.yellow()),
        }
    }
}
