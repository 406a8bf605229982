//! Chat-style command handling.
//!
//! Turns one inbound text message such as `/info alice` into a [`Reply`].
//! Every failure becomes a short user-facing message; nothing here ends the
//! conversation or touches other entities' data.

use std::fmt::Write;

use pt_store::{AddOutcome, StoreError};
use thiserror::Error;

use crate::tracker::{ExportDocument, Tracker, TrackerError};

/// Greeting sent for `/start`.
pub const GREETING: &str = "👋 I'm tracking presence! Use /add, /remove, /list, /info, /export.";

const USAGE: &str = "\
/add <id> <name> - start tracking an entity
/remove <name> - stop tracking and delete its log
/list - show tracked entities
/info <name> - show the presence report
/export <name> - send the presence report as a file";

/// What to send back for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Document(ExportDocument),
}

#[derive(Debug, Error)]
pub enum CommandError {
    /// Wrong number of arguments for the command.
    #[error("Usage: {0}")]
    InvalidArgs(&'static str),
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

impl CommandError {
    /// The short message shown to the sender.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidArgs(usage) => format!("Usage: {usage}"),
            Self::Unknown(command) => format!("🤷 Unknown command {command}. Try /help."),
            Self::Tracker(TrackerError::Store(StoreError::NotFound(_))) => {
                "❌ Entity not found.".to_string()
            }
            Self::Tracker(TrackerError::Store(StoreError::DuplicateName { name, existing_id })) => {
                format!("❌ The name {name} is already used by ID {existing_id}.")
            }
            Self::Tracker(TrackerError::Store(StoreError::InvalidName(value))) => {
                format!("❌ {value:?} cannot be used as an ID or name.")
            }
            Self::Tracker(TrackerError::MalformedLog { name, source }) => {
                format!("❌ The log for {name} has a malformed entry (#{}).", source.index)
            }
            Self::Tracker(TrackerError::Store(_)) => {
                "❌ Storage error, try again later.".to_string()
            }
        }
    }
}

/// Routes chat commands to a [`Tracker`].
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tracker: Tracker,
}

impl Dispatcher {
    pub const fn new(tracker: Tracker) -> Self {
        Self { tracker }
    }

    /// Handles one message. Never fails; errors become text replies.
    pub fn handle(&self, message: &str) -> Reply {
        match self.dispatch(message) {
            Ok(reply) => reply,
            Err(e) => {
                match &e {
                    CommandError::Tracker(TrackerError::Store(
                        StoreError::Io { .. } | StoreError::Json { .. },
                    )) => tracing::error!(error = %e, input = message, "command failed"),
                    _ => tracing::debug!(error = %e, input = message, "command rejected"),
                }
                Reply::Text(e.user_message())
            }
        }
    }

    fn dispatch(&self, message: &str) -> Result<Reply, CommandError> {
        let mut words = message.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(Reply::Text(GREETING.to_string()));
        };
        let args: Vec<&str> = words.collect();

        // "/info@some_bot alice" addresses a specific bot in group chats
        let command = head.split('@').next().unwrap_or(head);

        match command {
            "/start" => Ok(Reply::Text(GREETING.to_string())),
            "/help" => Ok(Reply::Text(format!("{GREETING}\n\n{USAGE}"))),
            "/add" => self.add(&args),
            "/remove" => self.remove(&args),
            "/list" => self.list(),
            "/info" => self.info(&args),
            "/export" => self.export(&args),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }

    fn add(&self, args: &[&str]) -> Result<Reply, CommandError> {
        let [id, name] = args else {
            return Err(CommandError::InvalidArgs("/add <id> <name>"));
        };
        let text = match self.tracker.add(id, name)? {
            AddOutcome::Inserted => format!("✅ Added {name} (ID: {id})"),
            AddOutcome::Replaced { previous_name } => {
                format!("✅ Renamed ID {id}: {previous_name} → {name}")
            }
        };
        Ok(Reply::Text(text))
    }

    fn remove(&self, args: &[&str]) -> Result<Reply, CommandError> {
        let [name] = args else {
            return Err(CommandError::InvalidArgs("/remove <name>"));
        };
        let removed = self.tracker.remove(name)?;
        Ok(Reply::Text(format!(
            "🗑 Removed {} (ID: {})",
            removed.name, removed.id
        )))
    }

    fn list(&self) -> Result<Reply, CommandError> {
        let entries = self.tracker.entries()?;
        if entries.is_empty() {
            return Ok(Reply::Text("⚠️ No entities added yet.".to_string()));
        }

        let mut text = String::from("👥 Tracked entities:\n");
        for entry in &entries {
            let _ = write!(text, "\n• {} (ID: {})", entry.name, entry.id);
        }
        Ok(Reply::Text(text))
    }

    fn info(&self, args: &[&str]) -> Result<Reply, CommandError> {
        let [name] = args else {
            return Err(CommandError::InvalidArgs("/info <name>"));
        };
        Ok(Reply::Text(self.tracker.summary(name)?))
    }

    fn export(&self, args: &[&str]) -> Result<Reply, CommandError> {
        let [name] = args else {
            return Err(CommandError::InvalidArgs("/export <name>"));
        };
        Ok(Reply::Document(self.tracker.export(name)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;
    use pt_core::RawEvent;
    use pt_store::Store;

    fn dispatcher() -> (tempfile::TempDir, Dispatcher) {
        let temp = tempfile::tempdir().unwrap();
        let store = Store::open(temp.path()).unwrap();
        let tracker = Tracker::new(store, chrono_tz::Asia::Kolkata, 20);
        (temp, Dispatcher::new(tracker))
    }

    fn text(reply: Reply) -> String {
        match reply {
            Reply::Text(text) => text,
            Reply::Document(doc) => panic!("expected text, got document {}", doc.filename),
        }
    }

    #[test]
    fn start_greets() {
        let (_temp, d) = dispatcher();
        assert_eq!(text(d.handle("/start")), GREETING);
        assert_eq!(text(d.handle("   ")), GREETING);
    }

    #[test]
    fn wrong_arity_reports_usage() {
        let (_temp, d) = dispatcher();
        assert_eq!(text(d.handle("/add 42")), "Usage: /add <id> <name>");
        assert_eq!(text(d.handle("/add 42 alice smith")), "Usage: /add <id> <name>");
        assert_eq!(text(d.handle("/remove")), "Usage: /remove <name>");
        assert_eq!(text(d.handle("/info")), "Usage: /info <name>");
        assert_eq!(text(d.handle("/export a b")), "Usage: /export <name>");
    }

    #[test]
    fn add_list_remove_flow() {
        let (_temp, d) = dispatcher();
        assert_eq!(text(d.handle("/list")), "⚠️ No entities added yet.");
        assert_eq!(text(d.handle("/add 42 alice")), "✅ Added alice (ID: 42)");
        assert_eq!(text(d.handle("/add 7 bob")), "✅ Added bob (ID: 7)");

        assert_snapshot!(text(d.handle("/list")), @r"
        👥 Tracked entities:

        • alice (ID: 42)
        • bob (ID: 7)
        ");

        assert_eq!(text(d.handle("/remove alice")), "🗑 Removed alice (ID: 42)");
        assert_eq!(text(d.handle("/remove alice")), "❌ Entity not found.");
    }

    #[test]
    fn add_existing_id_renames() {
        let (_temp, d) = dispatcher();
        d.handle("/add 42 alice");
        assert_eq!(text(d.handle("/add 42 alicia")), "✅ Renamed ID 42: alice → alicia");
    }

    #[test]
    fn add_rejects_taken_name() {
        let (_temp, d) = dispatcher();
        d.handle("/add 42 alice");
        assert_eq!(
            text(d.handle("/add 43 alice")),
            "❌ The name alice is already used by ID 42."
        );
    }

    #[test]
    fn info_unknown_entity() {
        let (_temp, d) = dispatcher();
        assert_eq!(text(d.handle("/info ghost")), "❌ Entity not found.");
    }

    #[test]
    fn info_renders_summary() {
        let (_temp, d) = dispatcher();
        d.handle("/add 42 alice");
        let summary = text(d.handle("/info alice"));
        assert!(summary.starts_with("📊 Presence report: alice (ID: 42)"));
        assert!(summary.contains("No session data yet."));
    }

    #[test]
    fn info_reports_malformed_log() {
        let (_temp, d) = dispatcher();
        d.handle("/add 42 alice");
        d.tracker
            .store()
            .save_log("alice", &[RawEvent::at("2024-13-45 99:00:00")])
            .unwrap();
        assert_eq!(
            text(d.handle("/info alice")),
            "❌ The log for alice has a malformed entry (#0)."
        );
        // Other commands keep working
        assert_eq!(text(d.handle("/add 7 bob")), "✅ Added bob (ID: 7)");
    }

    #[test]
    fn export_returns_document() {
        let (_temp, d) = dispatcher();
        d.handle("/add 42 alice");
        match d.handle("/export alice") {
            Reply::Document(doc) => {
                assert_eq!(doc.filename, "alice_session_report.txt");
                assert!(doc.contents.ends_with("No session data yet."));
            }
            Reply::Text(text) => panic!("expected document, got {text}"),
        }
    }

    #[test]
    fn bot_suffix_is_ignored() {
        let (_temp, d) = dispatcher();
        assert_eq!(text(d.handle("/start@presence_bot")), GREETING);
    }

    #[test]
    fn unknown_command_hints_help() {
        let (_temp, d) = dispatcher();
        assert_eq!(
            text(d.handle("/dance")),
            "🤷 Unknown command /dance. Try /help."
        );
        assert!(text(d.handle("/help")).contains("/export <name>"));
    }
}
