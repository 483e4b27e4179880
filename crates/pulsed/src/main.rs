use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;

use pulsed::{api, Config, Engine, StateStore};

/// Command line arguments
#[derive(Parser)]
#[command(name = "pulsed", version, about = "Pulse sensor to MQTT bridge daemon")]
struct Cli {
    /// Path to the config file
    #[arg(short, long, default_value = "pulsed.toml")]
    config: PathBuf,
}

/// Poll cadence used when the config has no `[pulse]` section to take it
/// from.
const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(60);
const DEFAULT_DISCOVERY_INTERVAL: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_file(&cli.config)?;

    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::from(config.logging.level))
        .init();

    tracing::info!("pulsed starting");
    tracing::info!("Loaded config from: {}", cli.config.display());

    let (update_interval, discovery_interval) = match &config.pulse {
        Some(pulse) => (pulse.update_interval(), pulse.discovery_interval()),
        None => (DEFAULT_UPDATE_INTERVAL, DEFAULT_DISCOVERY_INTERVAL),
    };
    let store = Arc::new(StateStore::new(update_interval, discovery_interval));

    let mut engine = Engine::new(store.clone());
    engine.register_integrations_from_config(&config)?;
    engine.start().await?;

    // Serve the status API if configured
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let api_task = config.api.as_ref().map(|api_config| {
        let listen = api_config.listen.clone();
        let port = api_config.port;
        let store = store.clone();
        tokio::spawn(async move {
            if let Err(e) = api::serve(listen, port, store, shutdown_rx).await {
                tracing::error!("HTTP API server error: {}", e);
            }
        })
    });

    // Wait for Ctrl+C
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received shutdown signal");
        }
        Err(e) => {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
        }
    }

    engine.stop().await;

    let _ = shutdown_tx.send(());
    if let Some(task) = api_task {
        let _ = task.await;
    }

    tracing::info!("pulsed shutdown complete");

    Ok(())
}
