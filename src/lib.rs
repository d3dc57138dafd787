//! Configuration registry with a REST exposition layer.
//!
//! Holds the current routing configuration snapshot, serves it over HTTP
//! (whole or drilled down to a single server or route) and accepts
//! replacement configuration for the `web` provider.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod http;
pub mod ingest;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod snapshot;

pub use config::schema::RegistryConfig;
pub use http::WebServer;
pub use ingest::ConfigAggregator;
pub use lifecycle::Shutdown;
pub use snapshot::{ConfigSnapshot, ProviderConfiguration, SnapshotStore};
