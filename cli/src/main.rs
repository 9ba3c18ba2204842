//! CLI entrypoint for twitch-tally
//!
//! Wires together all layers using dependency injection: the Twitch IRC
//! transport and file configuration from the infrastructure layer, the
//! console display and operator REPL from the presentation layer, and the
//! session orchestrator from the application layer.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tally_application::{
    ChatTransport, ConfigSource, NoArchive, PollArchive, PollDisplay, SessionOrchestrator,
    StaticConfigSource,
};
use tally_infrastructure::{
    ConfigLoader, FileConfigSource, JsonlPollArchive, TwitchChatTransport,
};
use tally_presentation::{Cli, ConsoleDisplay, OperatorRepl};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to a file when requested so they don't tear up the poll
    // display; the guard must outlive main
    let _log_guard = match &cli.log_file {
        Some(path) => {
            let directory = path.parent().filter(|p| !p.as_os_str().is_empty());
            let file_name = path
                .file_name()
                .context("--log-file must name a file")?;
            let appender = tracing_appender::rolling::never(
                directory.unwrap_or_else(|| std::path::Path::new(".")),
                file_name,
            );
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .init();
            None
        }
    };

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?
    };
    let settings = file_config.poll_settings();

    info!("starting twitch-tally");

    // === Dependency Injection ===
    let server = cli
        .server
        .clone()
        .unwrap_or_else(|| file_config.twitch.server.clone());
    let transport: Arc<dyn ChatTransport> = Arc::new(TwitchChatTransport::new(server));
    let display: Arc<dyn PollDisplay> = Arc::new(ConsoleDisplay::new());
    let archive: Arc<dyn PollArchive> = match &file_config.archive.path {
        Some(path) => match JsonlPollArchive::new(path) {
            Some(archive) => Arc::new(archive),
            None => Arc::new(NoArchive),
        },
        None => Arc::new(NoArchive),
    };
    let config_source: Arc<dyn ConfigSource> = if cli.no_config {
        Arc::new(StaticConfigSource::new(settings.clone()))
    } else {
        Arc::new(FileConfigSource::new(cli.config.clone()))
    };

    let (orchestrator, orchestrator_loop) =
        SessionOrchestrator::spawn(transport, display, config_source, archive, settings);

    if !cli.quiet {
        println!("twitch-tally {}", env!("CARGO_PKG_VERSION"));
    }

    let repl = OperatorRepl::new(orchestrator.clone());
    repl.run().await?;

    orchestrator.shutdown().await;
    let _ = orchestrator_loop.await;

    Ok(())
}
