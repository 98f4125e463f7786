/*!
 * Warden service binary
 */

use anyhow::{anyhow, Context};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use warden::config::WardenConfig;
use warden::inventory::{HttpComputeInventory, HttpVolumeInventory};
use warden::logging;
use warden_control::{Orchestrator, RetentionSweeper};
use warden_engine::RemoteEngine;

#[derive(Parser, Debug)]
#[command(
    name = "warden",
    version,
    about = "Disaster-recovery orchestration control plane"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "warden.toml")]
    config: PathBuf,

    /// Override the configured log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    /// Override the configured engine endpoint
    #[arg(long)]
    engine_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = WardenConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(level) = &cli.log_level {
        config.log.level = level.parse().map_err(|e| anyhow!("--log-level: {}", e))?;
    }
    if let Some(url) = cli.engine_url {
        config.engine.endpoint = url;
    }
    config
        .control
        .validate()
        .map_err(|e| anyhow!("invalid [control] configuration: {}", e))?;

    logging::init_logging(&config.log)?;
    info!("starting warden {}", env!("CARGO_PKG_VERSION"));

    let engine = Arc::new(RemoteEngine::new(config.engine.clone())?);
    engine.wait_until_ready().await;

    let compute = Arc::new(HttpComputeInventory::new(&config.compute)?);
    let volumes = Arc::new(HttpVolumeInventory::new(&config.volume)?);

    let sweeper = RetentionSweeper::new(engine.clone(), config.control.cleanup_interval_secs);
    let orchestrator = Arc::new(Orchestrator::new(
        config.control,
        engine,
        compute,
        volumes,
    )?);

    // Background loops; the request layer drives `orchestrator.protect` /
    // `orchestrator.recover` through its own transport.
    let optimization = orchestrator.clone();
    tokio::spawn(async move { optimization.run().await });
    tokio::spawn(async move { sweeper.run().await });

    tokio::signal::ctrl_c().await?;
    info!("shutdown requested; no further ticks will be scheduled");

    Ok(())
}
