//! Bounded conduit from configuration sources to the aggregator.

use thiserror::Error;
use tokio::sync::mpsc;

use crate::snapshot::ProviderConfiguration;

/// A configuration emitted by one provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigMessage {
    pub provider_name: String,
    pub configuration: ProviderConfiguration,
}

/// Errors raised when submitting a configuration.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The consuming side has been dropped.
    #[error("configuration ingest channel is closed")]
    Closed,
}

/// Sending half, cloned into every producer.
#[derive(Debug, Clone)]
pub struct IngestSender {
    tx: mpsc::Sender<ConfigMessage>,
}

impl IngestSender {
    /// Submit a configuration on behalf of `provider_name`.
    ///
    /// Waits while the channel is full; nothing is ever dropped. Returns once
    /// the message is queued, not once it is installed.
    pub async fn send(
        &self,
        provider_name: impl Into<String>,
        configuration: ProviderConfiguration,
    ) -> Result<(), IngestError> {
        let message = ConfigMessage {
            provider_name: provider_name.into(),
            configuration,
        };
        self.tx.send(message).await.map_err(|_| IngestError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving half, owned by the aggregator.
#[derive(Debug)]
pub struct IngestReceiver {
    rx: mpsc::Receiver<ConfigMessage>,
}

impl IngestReceiver {
    /// Next message, or `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<ConfigMessage> {
        self.rx.recv().await
    }

    /// Next message if one is already queued.
    pub fn try_recv(&mut self) -> Option<ConfigMessage> {
        self.rx.try_recv().ok()
    }
}

/// Create an ingest channel holding at most `capacity` pending messages.
///
/// # Panics
/// Panics if `capacity` is zero; validated configs never carry zero.
pub fn channel(capacity: usize) -> (IngestSender, IngestReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (IngestSender { tx }, IngestReceiver { rx })
}
