//! Presence event logs.
//!
//! A log is the full, ordered history of presence toggles for one entity.
//! On disk each entry only carries a civil timestamp; whether an entry marks
//! a transition to online or to offline is implied by its position (even
//! index goes online, odd index goes offline). An entry may also carry an
//! explicit `kind`, which must agree with its position.

use std::fmt;

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Civil timestamp format used by stored log entries.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Direction of a presence toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Toggle {
    Online,
    Offline,
}

impl Toggle {
    /// The toggle implied by a zero-based position in the log.
    #[must_use]
    pub const fn at_position(index: usize) -> Self {
        if index % 2 == 0 {
            Self::Online
        } else {
            Self::Offline
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stored log entry, exactly as it appears on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Civil time in [`TIMESTAMP_FORMAT`].
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Toggle>,
}

impl RawEvent {
    /// Creates an untagged entry at the given civil time.
    pub fn at(time: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            kind: None,
        }
    }
}

/// A parsed presence toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub timestamp: DateTime<Tz>,
    pub kind: Toggle,
}

/// Why a single log entry could not be used.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Malformed {
    #[error("invalid timestamp, expected YYYY-MM-DD HH:MM:SS: {0}")]
    InvalidTimestamp(#[from] chrono::ParseError),
    #[error("local time does not exist in {0}")]
    NonexistentLocalTime(Tz),
    #[error("expected a to-{expected} toggle, found to-{found}")]
    ToggleMismatch { expected: Toggle, found: Toggle },
}

/// A log entry that aborted parsing of an entity's log.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("malformed log entry #{index} ({value:?}): {reason}")]
pub struct MalformedLogEntry {
    /// Zero-based position of the entry.
    pub index: usize,
    /// The raw `time` value.
    pub value: String,
    pub reason: Malformed,
}

/// Parses a civil timestamp in the given timezone.
///
/// Times repeated by a DST fall-back resolve to the earlier instant. Times
/// skipped by a spring-forward gap are rejected.
pub fn parse_timestamp(value: &str, timezone: Tz) -> Result<DateTime<Tz>, Malformed> {
    let naive = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)?;
    match timezone.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Ok(dt),
        LocalResult::None => Err(Malformed::NonexistentLocalTime(timezone)),
    }
}

/// An entity's parsed presence history, in stored order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Parses stored entries. The first bad entry aborts the whole log.
    pub fn parse(raw: &[RawEvent], timezone: Tz) -> Result<Self, MalformedLogEntry> {
        let events = raw
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                parse_entry(index, entry, timezone).map_err(|reason| MalformedLogEntry {
                    index,
                    value: entry.time.clone(),
                    reason,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { events })
    }

    /// Builds a log from already-parsed timestamps, tagging them by position.
    pub fn from_timestamps(timestamps: impl IntoIterator<Item = DateTime<Tz>>) -> Self {
        let events = timestamps
            .into_iter()
            .enumerate()
            .map(|(index, timestamp)| Event {
                timestamp,
                kind: Toggle::at_position(index),
            })
            .collect();
        Self { events }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns `true` if timestamps never go backwards.
    ///
    /// Reconstruction does not depend on this; an out-of-order log simply
    /// yields negative session durations.
    pub fn is_chronological(&self) -> bool {
        self.events
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp)
    }
}

fn parse_entry(index: usize, entry: &RawEvent, timezone: Tz) -> Result<Event, Malformed> {
    let expected = Toggle::at_position(index);
    if let Some(found) = entry.kind {
        if found != expected {
            return Err(Malformed::ToggleMismatch { expected, found });
        }
    }
    Ok(Event {
        timestamp: parse_timestamp(&entry.time, timezone)?,
        kind: expected,
    })
}
