//! Core domain logic for the presence tracker.
//!
//! This crate turns an entity's raw toggle log into reports:
//! - Event logs: parsing stored civil timestamps in a fixed timezone
//! - Sessions: pairing toggles into closed and open sessions
//! - Aggregation: first-seen, total online time and current status
//! - Formatting: the chat summary and the exportable text document
//!
//! Everything here is pure and safe to run concurrently across entities.

mod aggregate;
pub mod event;
pub mod format;
mod report;
mod session;

pub use aggregate::{Aggregate, Status, aggregate};
pub use event::{Event, EventLog, Malformed, MalformedLogEntry, RawEvent, Toggle};
pub use format::{DEFAULT_HISTORY_WINDOW, export_filename, render_export, render_summary};
pub use report::{JsonReport, JsonSession, Report};
pub use session::{Reconstruction, Session, reconstruct};
