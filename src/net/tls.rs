//! TLS configuration and certificate loading.

use std::path::{Path, PathBuf};

use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TlsError {
    #[error("{kind} file not found: {path:?}")]
    MissingFile { kind: &'static str, path: PathBuf },

    #[error("Failed to load certificate pair: {0}")]
    Load(#[from] std::io::Error),
}

/// Load a PEM certificate chain and private key.
pub async fn load_tls_config(cert_file: &str, key_file: &str) -> Result<RustlsConfig, TlsError> {
    let cert_path = Path::new(cert_file);
    let key_path = Path::new(key_file);

    for (kind, path) in [("Certificate", cert_path), ("Private key", key_path)] {
        if !path.exists() {
            return Err(TlsError::MissingFile {
                kind,
                path: path.to_path_buf(),
            });
        }
    }

    let config = RustlsConfig::from_pem_file(cert_path, key_path).await?;
    tracing::info!(cert = %cert_file, "TLS certificate loaded");
    Ok(config)
}
