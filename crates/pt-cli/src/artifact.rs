//! Transient export artifacts.
//!
//! An export is written to a temporary file, handed to a [`ReportSink`] for
//! delivery and deleted afterwards. Deletion happens when the temporary file
//! drops, so a failed delivery never leaves the artifact behind.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::tracker::ExportDocument;

/// Receives finished export files.
pub trait ReportSink {
    /// Delivers the file at `artifact` under the name `filename`.
    ///
    /// `artifact` only lives for the duration of the call.
    fn deliver(&mut self, filename: &str, artifact: &Path) -> io::Result<()>;
}

/// Delivers exports by copying them into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Where a delivered file ends up.
    pub fn destination(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}

impl ReportSink for DirectorySink {
    fn deliver(&mut self, filename: &str, artifact: &Path) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::copy(artifact, self.destination(filename))?;
        Ok(())
    }
}

/// Writes `document` to a temporary file and passes it to `sink`.
pub fn deliver(document: &ExportDocument, sink: &mut dyn ReportSink) -> io::Result<()> {
    let mut artifact = tempfile::Builder::new()
        .prefix("pt-export-")
        .suffix(".txt")
        .tempfile()?;
    artifact.write_all(document.contents.as_bytes())?;
    artifact.flush()?;

    sink.deliver(&document.filename, artifact.path())?;
    tracing::debug!(filename = %document.filename, "delivered export");
    Ok(())
}
