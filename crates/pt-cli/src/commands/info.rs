//! Info command for showing an entity's presence report.

use std::io::Write;

use anyhow::{Context, Result};

use crate::Tracker;

/// Runs the info command.
pub fn run<W: Write>(writer: &mut W, tracker: &Tracker, name: &str, json: bool) -> Result<()> {
    if json {
        let report = tracker.report(name)?;
        let output = report.to_json().context("failed to serialize report")?;
        writeln!(writer, "{output}")?;
    } else {
        writeln!(writer, "{}", tracker.summary(name)?)?;
    }

    Ok(())
}
