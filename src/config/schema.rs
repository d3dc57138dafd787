//! Configuration schema definitions.
//!
//! This module defines the process configuration for the registry.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RegistryConfig {
    /// Expose `/debug/vars`.
    pub debug: bool,

    /// REST API listener and access settings.
    pub web: WebConfig,

    /// Ingest channel settings.
    pub ingest: IngestConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// REST API listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WebConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub address: String,

    /// Path to certificate file (PEM).
    pub cert_file: Option<String>,

    /// Path to private key file (PEM).
    pub key_file: Option<String>,

    /// Reject every mutation with 403.
    pub read_only: bool,

    /// Largest accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl WebConfig {
    /// Certificate and key paths, when both are set and non-empty.
    pub fn tls_files(&self) -> Option<(&str, &str)> {
        match (self.cert_file.as_deref(), self.key_file.as_deref()) {
            (Some(cert), Some(key)) if !cert.is_empty() && !key.is_empty() => Some((cert, key)),
            _ => None,
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0:8080".to_string(),
            cert_file: None,
            key_file: None,
            read_only: false,
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Ingest channel configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Pending configurations held before submitters wait.
    pub capacity: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self { capacity: 100 }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Time allowed for in-flight requests after a shutdown signal.
    pub shutdown_grace_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            shutdown_grace_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub log_json: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_json: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
