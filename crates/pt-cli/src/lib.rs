//! Presence tracker CLI library.
//!
//! Provides the `pt` command line, the chat command dispatcher and the
//! liveness endpoint, all on top of [`Tracker`].

mod artifact;
pub mod chat;
mod cli;
pub mod commands;
mod config;
pub mod ping;
mod tracker;

pub use artifact::{DirectorySink, ReportSink, deliver};
pub use cli::{Cli, Commands};
pub use config::Config;
pub use tracker::{ExportDocument, Tracker, TrackerError};
