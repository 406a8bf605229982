//! The presence-tracking service shared by the CLI and chat surfaces.
//!
//! Resolves display names through the store, loads logs and hands them to
//! the pure reporting pipeline in `pt-core`.

use chrono_tz::Tz;
use pt_core::{EventLog, MalformedLogEntry, Report, export_filename, render_export, render_summary};
use pt_store::{AddOutcome, Entry, Store, StoreError};
use rayon::prelude::*;
use thiserror::Error;

use crate::Config;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The entity's log has an entry that cannot be parsed.
    #[error("log for {name} is unreadable: {source}")]
    MalformedLog {
        name: String,
        #[source]
        source: MalformedLogEntry,
    },
}

/// A rendered export, ready to be delivered as a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub filename: String,
    pub contents: String,
}

#[derive(Debug, Clone)]
pub struct Tracker {
    store: Store,
    timezone: Tz,
    history_window: usize,
}

impl Tracker {
    pub const fn new(store: Store, timezone: Tz, history_window: usize) -> Self {
        Self {
            store,
            timezone,
            history_window,
        }
    }

    /// Opens the configured data directory.
    pub fn from_config(config: &Config) -> Result<Self, TrackerError> {
        let store = Store::open(&config.data_dir)?;
        Ok(Self::new(store, config.timezone, config.history_window))
    }

    pub const fn store(&self) -> &Store {
        &self.store
    }

    pub fn add(&self, id: &str, name: &str) -> Result<AddOutcome, TrackerError> {
        Ok(self.store.add_entity(id, name)?)
    }

    pub fn remove(&self, name: &str) -> Result<Entry, TrackerError> {
        Ok(self.store.remove_entity(name)?)
    }

    /// All tracked entities in stored order.
    pub fn entries(&self) -> Result<Vec<Entry>, TrackerError> {
        Ok(self.store.load_directory()?.entries().collect())
    }

    /// Builds the report for a display name.
    pub fn report(&self, name: &str) -> Result<Report, TrackerError> {
        let entry = self.store.resolve(name)?;
        self.report_for(&entry)
    }

    /// Builds the report for a known entry. A missing log counts as no data.
    pub fn report_for(&self, entry: &Entry) -> Result<Report, TrackerError> {
        let log = match self.store.load_log(&entry.name)? {
            Some(raw) => {
                EventLog::parse(&raw, self.timezone).map_err(|source| TrackerError::MalformedLog {
                    name: entry.name.clone(),
                    source,
                })?
            }
            None => {
                tracing::debug!(name = %entry.name, "no log yet");
                EventLog::default()
            }
        };

        if !log.is_chronological() {
            tracing::warn!(
                name = %entry.name,
                "log timestamps go backwards; some session durations will be negative"
            );
        }

        Ok(Report::build(&entry.id, &entry.name, &log, self.timezone))
    }

    /// Builds reports for every entity in parallel, in stored order.
    ///
    /// A failure for one entity does not affect the others.
    pub fn reports(&self) -> Result<Vec<(Entry, Result<Report, TrackerError>)>, TrackerError> {
        let entries = self.entries()?;
        Ok(entries
            .into_par_iter()
            .map(|entry| {
                let report = self.report_for(&entry);
                (entry, report)
            })
            .collect())
    }

    /// Renders the chat summary for a display name.
    pub fn summary(&self, name: &str) -> Result<String, TrackerError> {
        let report = self.report(name)?;
        Ok(render_summary(&report, self.history_window))
    }

    /// Renders the export document for a display name.
    pub fn export(&self, name: &str) -> Result<ExportDocument, TrackerError> {
        let report = self.report(name)?;
        Ok(ExportDocument {
            filename: export_filename(&report.display_name),
            contents: render_export(&report, self.history_window),
        })
    }
}
