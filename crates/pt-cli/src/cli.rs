//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Presence tracker.
///
/// Keeps a directory of tracked entities and turns their online/offline
/// toggle logs into session histories and online-time reports.
#[derive(Debug, Parser)]
#[command(name = "pt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start tracking an entity, or rename an existing ID.
    Add {
        /// Stable identifier of the entity.
        id: String,
        /// Display name, unique across the directory.
        name: String,
    },

    /// Stop tracking an entity and delete its log.
    Remove {
        /// Display name of the entity.
        name: String,
    },

    /// List tracked entities.
    List {
        /// Also show each entity's current status and total online time.
        #[arg(long)]
        status: bool,
    },

    /// Show an entity's presence report.
    Info {
        /// Display name of the entity.
        name: String,

        /// Output as JSON with every session.
        #[arg(long)]
        json: bool,
    },

    /// Export an entity's presence report as a text file.
    Export {
        /// Display name of the entity.
        name: String,

        /// Directory to write the report into.
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    /// Serve the liveness endpoint and answer chat commands read from stdin.
    Serve,
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_requires_id_and_name() {
        assert!(Cli::try_parse_from(["pt", "add", "42"]).is_err());
        assert!(Cli::try_parse_from(["pt", "add", "42", "alice", "extra"]).is_err());

        let cli = Cli::try_parse_from(["pt", "add", "42", "alice"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Add { ref id, ref name }) if id == "42" && name == "alice"
        ));
    }

    #[test]
    fn export_defaults_to_current_directory() {
        let cli = Cli::try_parse_from(["pt", "export", "alice"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Export { ref out, .. }) if out == &PathBuf::from(".")
        ));
    }
}
