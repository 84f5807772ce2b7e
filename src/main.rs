//! Simulated Sensor Device
//!
//! Serves fabricated sensor readings on `/sensor` and Prometheus metrics
//! about a simulated background process on `/metrics`.

use clap::Parser;
use sensor_sim::{
    config::{FileConfig, SensorConfig},
    metrics::{AppState, SensorMetrics, SensorServer},
    sensor::{DataBlob, Sampler},
};
use std::path::PathBuf;
use tokio::sync::watch;
use tracing::{error, info};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "sensor-sim", version, about)]
struct Args {
    /// Optional TOML file overriding the built-in defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    info!("Simulated sensor v{}", sensor_sim::VERSION);

    let config = match load_config(&args) {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let metrics = match SensorMetrics::new() {
        Ok(m) => m,
        Err(e) => {
            error!("Failed to create metrics registry: {}", e);
            std::process::exit(1);
        }
    };

    let blob = DataBlob::new(config.blob_size);
    info!(bytes = blob.len(), "Sensor payload allocated");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let sampler =
        Sampler::new(metrics.clone(), config.sampler.clone()).spawn(shutdown_rx.clone());

    let state = AppState::new(metrics, blob, config.payload_probability);
    let server = match SensorServer::bind(config.bind_addr, state).await {
        Ok(s) => s,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => {
                // Keep the sender alive: dropping it would stop the server.
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        }
        let _ = shutdown_tx.send(true);
    });

    if let Err(e) = server.run(shutdown_rx).await {
        error!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = sampler.await {
        error!("Sampler task failed: {}", e);
    }

    info!("Done");
}

fn load_config(args: &Args) -> Result<SensorConfig, sensor_sim::config::ConfigError> {
    match &args.config {
        Some(path) => {
            info!(path = %path.display(), "Loading configuration");
            Ok(FileConfig::from_file(path)?.sensor)
        }
        None => {
            let config = SensorConfig::default();
            config.validate()?;
            Ok(config)
        }
    }
}
