//! Session reconstruction.

use chrono::{DateTime, TimeDelta};
use chrono_tz::Tz;

use crate::event::Event;

/// A closed online interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    /// `end - start`. Negative if the log went backwards in time.
    pub duration: TimeDelta,
}

impl Session {
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Self {
            start,
            end,
            duration: end - start,
        }
    }
}

/// Sessions recovered from one log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconstruction {
    /// Closed sessions in log order.
    pub sessions: Vec<Session>,
    /// Start of the trailing unpaired session, if the entity is still online.
    pub open_start: Option<DateTime<Tz>>,
}

/// Pairs events by position into sessions.
///
/// `(events[0], events[1])`, `(events[2], events[3])`, ... each become one
/// closed session. A trailing unpaired event becomes `open_start`. Events are
/// taken in the order given and never sorted.
pub fn reconstruct(events: &[Event]) -> Reconstruction {
    let pairs = events.chunks_exact(2);
    let open_start = pairs.remainder().first().map(|event| event.timestamp);
    let sessions = pairs
        .map(|pair| Session::new(pair[0].timestamp, pair[1].timestamp))
        .collect();

    Reconstruction {
        sessions,
        open_start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    use crate::event::EventLog;

    const IST: Tz = chrono_tz::Asia::Kolkata;

    fn at(hour: u32, minute: u32) -> DateTime<Tz> {
        IST.with_ymd_and_hms(2024, 1, 1, hour, minute, 0).unwrap()
    }

    fn log_of(count: u32) -> EventLog {
        EventLog::from_timestamps((0..count).map(|i| at(i, 0)))
    }

    #[test]
    fn empty_log_has_no_sessions() {
        let result = reconstruct(&[]);
        assert!(result.sessions.is_empty());
        assert_eq!(result.open_start, None);
    }

    #[test]
    fn even_length_yields_only_closed_sessions() {
        for n in 0..6 {
            let log = log_of(2 * n);
            let result = reconstruct(log.events());
            assert_eq!(result.sessions.len(), n as usize);
            assert_eq!(result.open_start, None);
        }
    }

    #[test]
    fn odd_length_leaves_last_event_open() {
        for n in 0..6 {
            let log = log_of(2 * n + 1);
            let result = reconstruct(log.events());
            assert_eq!(result.sessions.len(), n as usize);
            assert_eq!(result.open_start, Some(at(2 * n, 0)));
        }
    }

    #[test]
    fn sessions_pair_adjacent_events() {
        let log = EventLog::from_timestamps([at(9, 0), at(10, 30), at(12, 0)]);
        let result = reconstruct(log.events());

        assert_eq!(result.sessions, vec![Session::new(at(9, 0), at(10, 30))]);
        assert_eq!(result.sessions[0].duration, TimeDelta::minutes(90));
        assert_eq!(result.open_start, Some(at(12, 0)));
    }

    #[test]
    fn out_of_order_log_yields_negative_duration() {
        let log = EventLog::from_timestamps([at(10, 0), at(9, 0)]);
        let result = reconstruct(log.events());
        assert_eq!(result.sessions[0].duration, TimeDelta::hours(-1));
    }

    #[test]
    fn reconstruct_is_repeatable() {
        let log = log_of(7);
        assert_eq!(reconstruct(log.events()), reconstruct(log.events()));
    }
}
