//! Human-readable renderings of a [`Report`].
//!
//! Two views share the same content:
//! - the summary, sent as a chat message
//! - the export, written to a standalone text file
//!
//! Both show at most the `window` most recent sessions, numbered from 1.

use std::fmt::{self, Write};

use chrono::{DateTime, TimeDelta};
use chrono_tz::Tz;

use crate::report::Report;
use crate::session::Session;

/// Number of recent sessions shown by default.
pub const DEFAULT_HISTORY_WINDOW: usize = 20;

/// Format for session start and end times (e.g. `01-01 09:00:00 AM`).
pub const SESSION_TIME_FORMAT: &str = "%m-%d %I:%M:%S %p";

/// Format for the first-seen line (e.g. `01-01 09:00:00 IST`).
pub const FIRST_SEEN_FORMAT: &str = "%m-%d %H:%M:%S %Z";

/// Returns the conventional export file name for an entity.
pub fn export_filename(display_name: &str) -> String {
    format!("{display_name}_session_report.txt")
}

/// Formats a span as `H:MM:SS`, prefixed with days past 24 hours.
///
/// Negative spans keep a leading `-`. Sub-second precision is dropped.
pub fn format_duration(span: TimeDelta) -> String {
    let total = span.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let secs = total.unsigned_abs();

    let days = secs / 86_400;
    let hours = secs % 86_400 / 3_600;
    let minutes = secs % 3_600 / 60;
    let seconds = secs % 60;
    let clock = format!("{hours}:{minutes:02}:{seconds:02}");

    match days {
        0 => format!("{sign}{clock}"),
        1 => format!("{sign}1 day, {clock}"),
        n => format!("{sign}{n} days, {clock}"),
    }
}

fn session_time(dt: &DateTime<Tz>) -> String {
    dt.format(SESSION_TIME_FORMAT).to_string()
}

/// The trailing `window` sessions.
pub fn recent_sessions(sessions: &[Session], window: usize) -> &[Session] {
    &sessions[sessions.len().saturating_sub(window)..]
}

fn write_overview(out: &mut String, report: &Report) -> fmt::Result {
    writeln!(
        out,
        "📊 Presence report: {} (ID: {})",
        report.display_name, report.entity_id
    )?;
    writeln!(out)?;
    match report.first_seen {
        Some(first_seen) => {
            writeln!(out, "👤 First seen: {}", first_seen.format(FIRST_SEEN_FORMAT))?;
        }
        None => writeln!(out, "👤 First seen: Unknown")?,
    }
    writeln!(
        out,
        "⏱ Total online time: {}",
        format_duration(report.total_online)
    )?;
    writeln!(out)?;
    writeln!(out, "Status: {} {}", report.status.marker(), report.status)?;
    writeln!(out)?;
    write!(out, "📅 Session history ({} sessions):", report.sessions.len())
}

fn write_summary(out: &mut String, report: &Report, window: usize) -> fmt::Result {
    write_overview(out, report)?;
    writeln!(out)?;

    if !report.has_data {
        writeln!(out)?;
        writeln!(out, "No session data yet.")?;
    }

    for (number, session) in (1..).zip(recent_sessions(&report.sessions, window)) {
        writeln!(out)?;
        writeln!(out, "{number}) 🟢 {}", session_time(&session.start))?;
        writeln!(out, "   🔴 {}", session_time(&session.end))?;
        writeln!(out, "   ⏱ {}", format_duration(session.duration))?;
    }

    Ok(())
}

fn write_export(out: &mut String, report: &Report, window: usize) -> fmt::Result {
    write_overview(out, report)?;
    writeln!(out)?;
    writeln!(out)?;

    if !report.has_data {
        writeln!(out, "No session data yet.")?;
    }

    for (number, session) in (1..).zip(recent_sessions(&report.sessions, window)) {
        writeln!(out, "{number}) 🟢 {}", session_time(&session.start))?;
        writeln!(out, "    🔴 {}", session_time(&session.end))?;
        writeln!(out, "    ⏱ {}", format_duration(session.duration))?;
        writeln!(out)?;
    }

    Ok(())
}

/// Renders the chat summary.
pub fn render_summary(report: &Report, window: usize) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_summary(&mut out, report, window);
    out
}

/// Renders the export document, trimmed of surrounding whitespace.
pub fn render_export(report: &Report, window: usize) -> String {
    let mut out = String::new();
    let _ = write_export(&mut out, report, window);
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use insta::assert_snapshot;

    use crate::event::{EventLog, RawEvent};

    const IST: Tz = chrono_tz::Asia::Kolkata;

    fn report(times: &[&str]) -> Report {
        let raw: Vec<_> = times.iter().map(|t| RawEvent::at(*t)).collect();
        Report::build("42", "alice", &EventLog::parse(&raw, IST).unwrap(), IST)
    }

    /// Builds `count` one-hour sessions on consecutive days of January.
    fn report_with_sessions(count: u32) -> Report {
        let timestamps = (0..count).flat_map(|day| {
            let start = IST.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()
                + TimeDelta::days(i64::from(day));
            [start, start + TimeDelta::hours(1)]
        });
        Report::build("7", "bob", &EventLog::from_timestamps(timestamps), IST)
    }

    // ========== Duration Formatting Tests ==========

    #[test]
    fn test_format_duration_clock() {
        assert_eq!(format_duration(TimeDelta::zero()), "0:00:00");
        assert_eq!(format_duration(TimeDelta::minutes(90)), "1:30:00");
        assert_eq!(format_duration(TimeDelta::seconds(59)), "0:00:59");
        assert_eq!(format_duration(TimeDelta::hours(23)), "23:00:00");
    }

    #[test]
    fn test_format_duration_days() {
        assert_eq!(format_duration(TimeDelta::hours(24)), "1 day, 0:00:00");
        assert_eq!(
            format_duration(TimeDelta::hours(50) + TimeDelta::seconds(5)),
            "2 days, 2:00:05"
        );
    }

    #[test]
    fn test_format_duration_negative() {
        assert_eq!(format_duration(TimeDelta::hours(-1)), "-1:00:00");
        assert_eq!(format_duration(TimeDelta::hours(-25)), "-1 day, 1:00:00");
    }

    #[test]
    fn test_format_duration_drops_subseconds() {
        assert_eq!(format_duration(TimeDelta::milliseconds(1_999)), "0:00:01");
    }

    // ========== Window Tests ==========

    #[test]
    fn test_recent_sessions_window() {
        let many = report_with_sessions(25);
        let recent = recent_sessions(&many.sessions, DEFAULT_HISTORY_WINDOW);
        assert_eq!(recent.len(), 20);
        assert_eq!(recent[0], many.sessions[5]);

        let few = report_with_sessions(3);
        assert_eq!(recent_sessions(&few.sessions, DEFAULT_HISTORY_WINDOW).len(), 3);
        assert!(recent_sessions(&few.sessions, 0).is_empty());
    }

    #[test]
    fn test_summary_never_exceeds_window() {
        let output = render_summary(&report_with_sessions(25), DEFAULT_HISTORY_WINDOW);
        assert!(output.contains("(25 sessions)"));
        assert!(output.contains("\n1) 🟢 01-06 08:00:00 AM"));
        assert!(output.contains("\n20) 🟢 01-25 08:00:00 AM"));
        assert!(!output.contains("\n21) "));
        assert_eq!(output.matches("🔴 01-").count(), 20);
    }

    #[test]
    fn test_export_never_exceeds_window() {
        let output = render_export(&report_with_sessions(30), 5);
        assert!(output.contains("(30 sessions)"));
        assert!(output.starts_with("📊"));
        assert!(output.contains("1) 🟢 01-26 08:00:00 AM"));
        assert!(output.contains("5) 🟢 01-30 08:00:00 AM"));
        assert!(!output.contains("6) "));
    }

    // ========== Rendering Tests (Snapshot) ==========

    #[test]
    fn test_summary_online() {
        let output = render_summary(
            &report(&["2024-01-01 09:00:00", "2024-01-01 10:30:00", "2024-01-01 12:00:00"]),
            DEFAULT_HISTORY_WINDOW,
        );
        assert_snapshot!(output, @r"
        📊 Presence report: alice (ID: 42)

        👤 First seen: 01-01 09:00:00 IST
        ⏱ Total online time: 1:30:00

        Status: 🟢 online

        📅 Session history (1 sessions):

        1) 🟢 01-01 09:00:00 AM
           🔴 01-01 10:30:00 AM
           ⏱ 1:30:00
        ");
    }

    #[test]
    fn test_summary_without_data() {
        let output = render_summary(&report(&[]), DEFAULT_HISTORY_WINDOW);
        assert_snapshot!(output, @r"
        📊 Presence report: alice (ID: 42)

        👤 First seen: Unknown
        ⏱ Total online time: 0:00:00

        Status: 🔴 offline

        📅 Session history (0 sessions):

        No session data yet.
        ");
    }

    #[test]
    fn test_summary_online_without_closed_sessions() {
        let output = render_summary(&report(&["2024-01-01 21:15:00"]), DEFAULT_HISTORY_WINDOW);
        assert!(output.contains("👤 First seen: 01-01 21:15:00 IST"));
        assert!(output.contains("Status: 🟢 online"));
        assert!(output.contains("(0 sessions):"));
        assert!(!output.contains("No session data yet."));
    }

    #[test]
    fn test_export_document() {
        let output = render_export(
            &report(&[
                "2024-01-01 09:00:00",
                "2024-01-01 10:30:00",
                "2024-01-01 13:00:00",
                "2024-01-01 14:00:05",
            ]),
            DEFAULT_HISTORY_WINDOW,
        );
        assert_snapshot!(output, @r"
        📊 Presence report: alice (ID: 42)

        👤 First seen: 01-01 09:00:00 IST
        ⏱ Total online time: 2:30:05

        Status: 🔴 offline

        📅 Session history (2 sessions):

        1) 🟢 01-01 09:00:00 AM
            🔴 01-01 10:30:00 AM
            ⏱ 1:30:00

        2) 🟢 01-01 01:00:00 PM
            🔴 01-01 02:00:05 PM
            ⏱ 1:00:05
        ");
    }

    #[test]
    fn test_export_is_trimmed() {
        let output = render_export(&report(&[]), DEFAULT_HISTORY_WINDOW);
        assert!(output.ends_with("No session data yet."));
        assert_eq!(output, output.trim());
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename("alice"), "alice_session_report.txt");
    }
}
