//! Per-entity aggregate reports.

use chrono::{DateTime, SecondsFormat, TimeDelta};
use chrono_tz::Tz;
use serde::Serialize;

use crate::aggregate::{Status, aggregate};
use crate::event::EventLog;
use crate::session::{Session, reconstruct};

/// Everything the formatter needs to describe one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub entity_id: String,
    pub display_name: String,
    /// Zone the log was read in and every time is shown in.
    pub timezone: Tz,
    pub first_seen: Option<DateTime<Tz>>,
    pub total_online: TimeDelta,
    pub status: Status,
    /// Closed sessions, oldest first.
    pub sessions: Vec<Session>,
    /// Start of the ongoing session, if any.
    pub open_start: Option<DateTime<Tz>>,
    /// `false` when the entity has no recorded events at all.
    pub has_data: bool,
}

impl Report {
    /// Reconstructs and aggregates an entity's log.
    pub fn build(entity_id: &str, display_name: &str, log: &EventLog, timezone: Tz) -> Self {
        let reconstruction = reconstruct(log.events());
        let summary = aggregate(&reconstruction.sessions, reconstruction.open_start);

        Self {
            entity_id: entity_id.to_string(),
            display_name: display_name.to_string(),
            timezone,
            first_seen: summary.first_seen,
            total_online: summary.total_online,
            status: summary.status,
            sessions: reconstruction.sessions,
            open_start: reconstruction.open_start,
            has_data: !log.is_empty(),
        }
    }

    pub const fn is_online(&self) -> bool {
        matches!(self.status, Status::Online)
    }

    /// Formats the report as pretty-printed JSON, including every session.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&JsonReport::from(self))
    }
}

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub entity_id: String,
    pub display_name: String,
    pub timezone: String,
    pub first_seen: Option<String>,
    pub total_online_secs: i64,
    pub status: Status,
    pub online_since: Option<String>,
    pub session_count: usize,
    pub sessions: Vec<JsonSession>,
}

#[derive(Debug, Serialize)]
pub struct JsonSession {
    pub start: String,
    pub end: String,
    pub duration_secs: i64,
}

fn rfc3339(dt: &DateTime<Tz>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, false)
}

impl From<&Report> for JsonReport {
    fn from(report: &Report) -> Self {
        Self {
            entity_id: report.entity_id.clone(),
            display_name: report.display_name.clone(),
            timezone: report.timezone.name().to_string(),
            first_seen: report.first_seen.as_ref().map(rfc3339),
            total_online_secs: report.total_online.num_seconds(),
            status: report.status,
            online_since: report.open_start.as_ref().map(rfc3339),
            session_count: report.sessions.len(),
            sessions: report
                .sessions
                .iter()
                .map(|s| JsonSession {
                    start: rfc3339(&s.start),
                    end: rfc3339(&s.end),
                    duration_secs: s.duration.num_seconds(),
                })
                .collect(),
        }
    }
}
