//! # Command Line Interface
//!
//! Entry point of the `cloudplane` binary: load configuration, wire the
//! cache to its consumers and run the poller until interrupted.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use crate::cache::{CloudCache, LoggingEventHandler};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::observability::{init_observability, log_config_info};
use crate::poller::Poller;
use crate::source::{HttpSnapshotSource, SnapshotSource, StaticSnapshotSource};
use crate::{APP_NAME, VERSION};

#[derive(Debug, Parser)]
#[command(name = "cloudplane")]
#[command(about = "Cloudplane proxy configuration sync")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run a single reconciliation pass and exit
    #[arg(long)]
    pub once: bool,

    /// Serve a local JSON snapshot instead of polling the HTTP source
    #[arg(long, value_name = "PATH")]
    pub snapshot_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the control plane with parsed arguments
pub async fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if cli.verbose {
        config.observability.log_level = "debug".to_string();
    }

    init_observability(&config.observability)?;
    info!(app_name = APP_NAME, version = VERSION, "Starting Cloudplane control plane");
    log_config_info(&config);

    let cache = Arc::new(CloudCache::new(
        Arc::new(LoggingEventHandler::new("hosts")),
        Arc::new(LoggingEventHandler::new("endpoints")),
    ));
    let source = build_source(&cli, &config)?;
    let poller = Poller::from_config(&config, source, cache);

    if cli.once {
        let report = poller.poll_once().await?;
        info!(
            notifications = report.total(),
            hosts_added = report.hosts.added,
            hosts_updated = report.hosts.updated,
            "Single reconciliation pass complete"
        );
        return Ok(());
    }

    let handle = poller.spawn();

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    handle.shutdown_and_join().await?;
    info!("Cloudplane shutdown completed");
    Ok(())
}

fn build_source(cli: &Cli, config: &AppConfig) -> Result<Arc<dyn SnapshotSource>> {
    match &cli.snapshot_file {
        Some(path) => {
            info!(path = %path.display(), "Serving snapshot from file");
            Ok(Arc::new(StaticSnapshotSource::from_file(path)?))
        }
        None => Ok(Arc::new(HttpSnapshotSource::new(&config.source)?)),
    }
}
