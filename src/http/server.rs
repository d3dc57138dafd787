//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, timeout, body limit, stats)
//! - Bind the listen address, plain or TLS
//! - Serve until shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::DefaultBodyLimit, middleware, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::api::setup_api_router;
use crate::config::RegistryConfig;
use crate::http::request::{propagate_request_id_layer, request_span, set_request_id_layer};
use crate::ingest::IngestSender;
use crate::net::{load_tls_config, TlsError};
use crate::observability::{stats::track_requests, RequestStats, VarRegistry};
use crate::snapshot::SnapshotStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SnapshotStore>,
    pub ingest: IngestSender,
    pub read_only: bool,
    pub max_body_bytes: usize,
    pub stats: Arc<RequestStats>,
    pub vars: Arc<VarRegistry>,
}

/// Failures that end the server task.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Error creating server on {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP server for the REST API and dashboard.
pub struct WebServer {
    config: RegistryConfig,
    state: AppState,
}

impl WebServer {
    pub fn new(config: RegistryConfig, store: Arc<SnapshotStore>, ingest: IngestSender) -> Self {
        let state = AppState {
            store,
            ingest,
            read_only: config.web.read_only,
            max_body_bytes: config.web.max_body_bytes,
            stats: Arc::new(RequestStats::new()),
            vars: Arc::new(VarRegistry::with_process_vars()),
        };
        Self { config, state }
    }

    /// Replace the process variable registry dumped by `/debug/vars`.
    pub fn with_vars(mut self, vars: Arc<VarRegistry>) -> Self {
        self.state.vars = vars;
        self
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn router(&self) -> Router {
        setup_api_router(self.state.clone(), self.config.debug)
            .layer(middleware::from_fn_with_state(
                Arc::clone(&self.state.stats),
                track_requests,
            ))
            .layer(DefaultBodyLimit::max(self.config.web.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.timeouts.request_secs,
            )))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(set_request_id_layer())
    }

    /// Run the server on its own task.
    ///
    /// The task owns the listen socket until shutdown. A bind failure comes
    /// back through the handle and is meant to end the process.
    pub fn spawn(self, shutdown: broadcast::Receiver<()>) -> JoinHandle<Result<(), ServerError>> {
        tokio::spawn(self.run(shutdown))
    }

    /// Bind the configured address and serve until shutdown.
    pub async fn run(self, shutdown: broadcast::Receiver<()>) -> Result<(), ServerError> {
        let address = self.config.web.address.clone();
        let listener = TcpListener::bind(address.as_str())
            .await
            .map_err(|source| ServerError::Bind { address, source })?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        let app = self.router();

        tracing::info!(
            address = %addr,
            read_only = self.config.web.read_only,
            debug = self.config.debug,
            "HTTP server starting"
        );

        match self.config.web.tls_files() {
            Some((cert_file, key_file)) => {
                let tls = load_tls_config(cert_file, key_file).await?;
                let handle = axum_server::Handle::new();
                let grace = Duration::from_secs(self.config.timeouts.shutdown_grace_secs);

                let shutdown_handle = handle.clone();
                tokio::spawn(async move {
                    let _ = shutdown.recv().await;
                    shutdown_handle.graceful_shutdown(Some(grace));
                });

                tracing::info!(address = %addr, "Serving TLS");
                axum_server::from_tcp_rustls(listener.into_std()?, tls)
                    .handle(handle)
                    .serve(app.into_make_service())
                    .await?;
            }
            None => {
                if self.config.web.cert_file.is_some() || self.config.web.key_file.is_some() {
                    tracing::warn!("TLS needs both cert_file and key_file, serving plaintext");
                }
                axum::serve(listener, app.into_make_service())
                    .with_graceful_shutdown(async move {
                        let _ = shutdown.recv().await;
                    })
                    .await?;
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
