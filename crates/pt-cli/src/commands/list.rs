//! List command for showing tracked entities.

use std::io::Write;

use anyhow::Result;
use pt_core::format::format_duration;

use crate::Tracker;

/// Runs the list command.
///
/// With `status`, every entity's log is read and summarized. Logs are
/// processed in parallel; an unreadable log only affects its own row.
pub fn run<W: Write>(writer: &mut W, tracker: &Tracker, status: bool) -> Result<()> {
    if !status {
        let entries = tracker.entries()?;
        if entries.is_empty() {
            writeln!(writer, "No entities added yet. Run 'pt add <id> <name>' to start tracking.")?;
            return Ok(());
        }

        writeln!(writer, "{:<20} ID", "NAME")?;
        for entry in &entries {
            writeln!(writer, "{:<20} {}", entry.name, entry.id)?;
        }
        return Ok(());
    }

    let reports = tracker.reports()?;
    if reports.is_empty() {
        writeln!(writer, "No entities added yet. Run 'pt add <id> <name>' to start tracking.")?;
        return Ok(());
    }

    writeln!(writer, "{:<20} {:<16} {:<8} TOTAL ONLINE", "NAME", "ID", "STATUS")?;
    for (entry, report) in &reports {
        match report {
            Ok(report) => {
                let state = if report.has_data {
                    report.status.as_str()
                } else {
                    "-"
                };
                writeln!(
                    writer,
                    "{:<20} {:<16} {:<8} {}",
                    entry.name,
                    entry.id,
                    state,
                    format_duration(report.total_online)
                )?;
            }
            Err(e) => {
                tracing::warn!(name = %entry.name, error = %e, "failed to summarize entity");
                writeln!(writer, "{:<20} {:<16} {:<8} -", entry.name, entry.id, "error")?;
            }
        }
    }

    Ok(())
}
