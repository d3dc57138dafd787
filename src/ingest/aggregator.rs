//! Installs submitted configurations into the snapshot store.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::ingest::channel::{ConfigMessage, IngestReceiver};
use crate::observability::metrics;
use crate::snapshot::SnapshotStore;

/// Single consumer of the ingest channel and sole writer of the store.
pub struct ConfigAggregator {
    store: Arc<SnapshotStore>,
    updates: IngestReceiver,
}

impl ConfigAggregator {
    pub fn new(store: Arc<SnapshotStore>, updates: IngestReceiver) -> Self {
        Self { store, updates }
    }

    /// Consume messages until shutdown or until every sender is dropped.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!("Configuration aggregator starting");
        loop {
            tokio::select! {
                message = self.updates.recv() => {
                    match message {
                        Some(message) => {
                            self.apply(message);
                        }
                        None => {
                            tracing::info!("All configuration sources closed");
                            break;
                        }
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Aggregator received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Install `message` as its provider's configuration.
    ///
    /// Returns `false` when the provider already has an identical
    /// configuration and the store was left untouched.
    pub fn apply(&self, message: ConfigMessage) -> bool {
        let ConfigMessage {
            provider_name,
            configuration,
        } = message;

        if self.store.load().provider(&provider_name) == Some(&configuration) {
            tracing::info!(provider = %provider_name, "Skipping same configuration");
            return false;
        }

        let configuration = Arc::new(configuration);
        let installed = self.store.update(|current| {
            current
                .clone()
                .with_provider(provider_name.clone(), Arc::clone(&configuration))
        });

        metrics::record_config_update(&provider_name);
        metrics::record_snapshot_providers(installed.len());
        tracing::info!(
            provider = %provider_name,
            backends = configuration.backends.len(),
            frontends = configuration.frontends.len(),
            "Configuration installed"
        );
        true
    }
}
