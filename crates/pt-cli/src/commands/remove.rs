//! Remove command for dropping an entity and its log.

use std::io::Write;

use anyhow::Result;

use crate::Tracker;

/// Runs the remove command.
pub fn run<W: Write>(writer: &mut W, tracker: &Tracker, name: &str) -> Result<()> {
    let removed = tracker.remove(name)?;
    writeln!(writer, "Removed {} (ID: {})", removed.name, removed.id)?;
    Ok(())
}
