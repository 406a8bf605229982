//! Add command for starting to track an entity.

use std::io::Write;

use anyhow::Result;
use pt_store::AddOutcome;

use crate::Tracker;

/// Runs the add command.
pub fn run<W: Write>(writer: &mut W, tracker: &Tracker, id: &str, name: &str) -> Result<()> {
    match tracker.add(id, name)? {
        AddOutcome::Inserted => writeln!(writer, "Added {name} (ID: {id})")?,
        AddOutcome::Replaced { previous_name } => {
            writeln!(writer, "Renamed ID {id}: {previous_name} -> {name}")?;
        }
    }
    Ok(())
}
