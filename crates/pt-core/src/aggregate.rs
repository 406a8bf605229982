//! Summary statistics over reconstructed sessions.

use std::fmt;

use chrono::{DateTime, TimeDelta};
use chrono_tz::Tz;
use serde::Serialize;

use crate::session::Session;

/// Current presence of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Online,
    Offline,
}

impl Status {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }

    /// Colored marker shown next to the status word.
    #[must_use]
    pub const fn marker(&self) -> &'static str {
        match self {
            Self::Online => "🟢",
            Self::Offline => "🔴",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregate {
    /// `None` when the log is empty.
    pub first_seen: Option<DateTime<Tz>>,
    /// Sum of closed session durations. The open session is not counted.
    pub total_online: TimeDelta,
    pub status: Status,
}

impl Aggregate {
    pub const fn is_online(&self) -> bool {
        matches!(self.status, Status::Online)
    }
}

pub fn aggregate(sessions: &[Session], open_start: Option<DateTime<Tz>>) -> Aggregate {
    let first_seen = sessions.first().map(|s| s.start).or(open_start);
    let total_online = sessions
        .iter()
        .fold(TimeDelta::zero(), |total, s| total + s.duration);
    let status = if open_start.is_some() {
        Status::Online
    } else {
        Status::Offline
    };

    Aggregate {
        first_seen,
        total_online,
        status,
    }
}
