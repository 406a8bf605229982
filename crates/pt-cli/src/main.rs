use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pt_cli::commands::{add, export, info, list, remove, serve};
use pt_cli::{Cli, Commands, Config, Tracker};

/// Load config and open the data directory.
fn open_tracker(config_path: Option<&Path>) -> Result<(Tracker, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let tracker = Tracker::from_config(&config).context("failed to open data directory")?;
    Ok((tracker, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so stdout stays clean for replies and reports
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    // Hosting platforms often provide PORT and PT_* through a .env file
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "failed to load .env"),
    }

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (tracker, config) = open_tracker(cli.config.as_deref())?;
    let mut stdout = io::stdout().lock();

    match command {
        Commands::Add { id, name } => add::run(&mut stdout, &tracker, id, name)?,
        Commands::Remove { name } => remove::run(&mut stdout, &tracker, name)?,
        Commands::List { status } => list::run(&mut stdout, &tracker, *status)?,
        Commands::Info { name, json } => info::run(&mut stdout, &tracker, name, *json)?,
        Commands::Export { name, out } => export::run(&mut stdout, &tracker, name, out)?,
        Commands::Serve => {
            drop(stdout);
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("failed to start async runtime")?;
            runtime.block_on(serve::run(tracker, &config))?;
        }
    }

    Ok(())
}
