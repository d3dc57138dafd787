//! Configuration registry server.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌──────────────────────────────────────────────────────┐
//!                   │                 CONFIGURATION REGISTRY                │
//!                   │                                                      │
//!   GET /api/...    │  ┌────────┐    ┌──────────┐    ┌─────────────────┐  │
//!   ────────────────┼─▶│  http  │───▶│   api    │───▶│ SnapshotStore   │  │
//!                   │  │ server │    │ handlers │    │  load() (once)  │  │
//!                   │  └────────┘    └────┬─────┘    └────────▲────────┘  │
//!                   │                     │                   │ update()  │
//!   PUT /api/       │                     ▼                   │           │
//!   providers/web   │               ┌──────────┐       ┌──────┴───────┐   │
//!   ────────────────┼──────────────▶│  ingest  │──────▶│  aggregator  │   │
//!                   │               │ channel  │       │              │   │
//!                   │               └──────────┘       └──────────────┘   │
//!                   │                                                      │
//!                   │  dashboard · /health · /debug/vars · prometheus      │
//!                   └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use config_registry::config::{load_config, validate_config, ConfigError, RegistryConfig};
use config_registry::ingest::{self, ConfigAggregator};
use config_registry::lifecycle::{spawn_signal_handler, Shutdown};
use config_registry::observability::{logging, metrics};
use config_registry::snapshot::SnapshotStore;
use config_registry::WebServer;

#[derive(Parser)]
#[command(name = "config-registry")]
#[command(about = "Serve the current routing configuration over a REST API", long_about = None)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides `web.address`.
    #[arg(short, long)]
    address: Option<String>,

    /// Reject every configuration update.
    #[arg(long)]
    read_only: bool,

    /// Expose /debug/vars.
    #[arg(long)]
    debug: bool,
}

fn resolve_config(args: &Args) -> Result<RegistryConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => RegistryConfig::default(),
    };

    if let Some(address) = &args.address {
        config.web.address = address.clone();
    }
    config.web.read_only |= args.read_only;
    config.debug |= args.debug;

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = resolve_config(&args)?;

    logging::init(&config.observability);

    tracing::info!("config-registry v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        address = %config.web.address,
        tls = config.web.tls_files().is_some(),
        read_only = config.web.read_only,
        debug = config.debug,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let shutdown = Shutdown::new();
    let store = Arc::new(SnapshotStore::new());
    let (ingest_tx, ingest_rx) = ingest::channel(config.ingest.capacity);

    let aggregator = ConfigAggregator::new(Arc::clone(&store), ingest_rx);
    let aggregator_task = tokio::spawn(aggregator.run(shutdown.subscribe()));

    let server = WebServer::new(config, store, ingest_tx);
    let server_task = server.spawn(shutdown.subscribe());
    spawn_signal_handler(shutdown.clone());

    let result = server_task.await;
    if !shutdown.is_triggered() {
        tracing::warn!("Server stopped without a shutdown signal, stopping aggregator");
    }
    shutdown.trigger();
    let _ = aggregator_task.await;

    match result {
        Ok(Ok(())) => {
            tracing::info!("Shutdown complete");
            Ok(())
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Server failed");
            Err(e.into())
        }
        Err(e) => {
            tracing::error!(error = %e, "Server task panicked");
            Err(e.into())
        }
    }
}
