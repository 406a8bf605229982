//! Serve command: chat commands on stdin plus the liveness endpoint.
//!
//! Each stdin line is one chat message; replies go to stdout. Exports are
//! delivered through a [`ReportSink`]. The liveness endpoint keeps running
//! after stdin closes, until the process receives ctrl-c.

use std::io;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use crate::chat::{Dispatcher, Reply};
use crate::{Config, DirectorySink, ReportSink, Tracker, artifact, ping};

/// Runs the serve command until shutdown.
pub async fn run(tracker: Tracker, config: &Config) -> Result<()> {
    let addr = SocketAddr::new(config.bind, config.port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind liveness endpoint on {addr}"))?;
    tracing::info!(%addr, "liveness endpoint listening");
    let server = tokio::spawn(ping::serve(listener, shutdown_signal()));

    let dispatcher = Dispatcher::new(tracker);
    let mut sink = DirectorySink::new(config.export_dir.clone());
    command_loop(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        &dispatcher,
        &mut sink,
    )
    .await
    .context("command loop failed")?;

    tracing::info!("command input closed, serving health checks until shutdown");
    server
        .await
        .context("liveness endpoint task failed")?
        .context("liveness endpoint failed")?;
    Ok(())
}

/// Handles one message per input line until the input closes.
pub async fn command_loop<R, W>(
    input: R,
    mut output: W,
    dispatcher: &Dispatcher,
    sink: &mut dyn ReportSink,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let message = line.trim();
        if message.is_empty() {
            continue;
        }

        // Store access blocks on file locks, so keep it off the async workers
        let reply = {
            let dispatcher = dispatcher.clone();
            let message = message.to_string();
            tokio::task::spawn_blocking(move || dispatcher.handle(&message))
                .await
                .map_err(io::Error::other)?
        };

        let text = match reply {
            Reply::Text(text) => text,
            Reply::Document(document) => match artifact::deliver(&document, sink) {
                Ok(()) => format!("📎 Sent {}", document.filename),
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        filename = %document.filename,
                        "export delivery failed"
                    );
                    "❌ Export failed.".to_string()
                }
            },
        };

        output.write_all(text.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
