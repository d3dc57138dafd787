//! The single mutating endpoint: `PUT /api/providers/{provider}`.

use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    response::Response,
};
use http_body_util::LengthLimitError;

use crate::api::error::ApiError;
use crate::api::handlers::get_config;
use crate::http::server::AppState;
use crate::snapshot::ProviderConfiguration;

/// The only provider id the REST API may write.
pub const WEB_PROVIDER: &str = "web";

/// Submit a replacement configuration for the `web` provider.
///
/// Checks run in order and stop at the first failure: target provider,
/// read-only mode, body size, body parsing. Only then is the configuration
/// queued. The body is not read until the first two checks pass.
/// The response re-reads the store, so it may not include this write yet.
pub async fn put_provider(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    body: Body,
) -> Result<Response, ApiError> {
    if provider != WEB_PROVIDER {
        tracing::warn!(provider = %provider, "Rejected update for non-web provider");
        return Err(ApiError::WrongProvider);
    }
    if state.read_only {
        tracing::warn!("Rejected update in read-only mode");
        return Err(ApiError::ReadOnly);
    }

    let body = read_body(body, state.max_body_bytes).await?;
    let configuration = ProviderConfiguration::from_json(&body).map_err(|e| {
        tracing::error!(error = %e, "Error parsing configuration");
        ApiError::from(e)
    })?;

    tracing::info!(
        backends = configuration.backends.len(),
        frontends = configuration.frontends.len(),
        "Submitting web configuration"
    );
    state.ingest.send(WEB_PROVIDER, configuration).await?;

    Ok(get_config(State(state)).await)
}

async fn read_body(body: Body, limit: usize) -> Result<Bytes, ApiError> {
    axum::body::to_bytes(body, limit).await.map_err(|e| {
        let e = e.into_inner();
        if e.downcast_ref::<LengthLimitError>().is_some() {
            tracing::warn!(limit, "Rejected oversized configuration");
            ApiError::PayloadTooLarge
        } else {
            tracing::error!(error = %e, "Error reading request body");
            ApiError::BodyRead
        }
    })
}
