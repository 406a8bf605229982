//! Export command for writing an entity's report as a text file.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::{DirectorySink, Tracker, artifact};

/// Runs the export command, delivering the report into `out_dir`.
pub fn run<W: Write>(writer: &mut W, tracker: &Tracker, name: &str, out_dir: &Path) -> Result<()> {
    let document = tracker.export(name)?;
    let mut sink = DirectorySink::new(out_dir.to_path_buf());
    artifact::deliver(&document, &mut sink)
        .with_context(|| format!("failed to export report to {}", out_dir.display()))?;

    writeln!(
        writer,
        "Exported {}",
        sink.destination(&document.filename).display()
    )?;
    Ok(())
}
