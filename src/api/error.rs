//! Per-request failures and their HTTP rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::ingest::IngestError;

/// Every error a REST handler can end a request with.
///
/// Bodies are short plain text; nothing internal is exposed.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Some path segment is absent from the current snapshot.
    #[error("404 page not found")]
    NotFound,

    /// Mutation attempted while read-only mode is on.
    #[error("REST API is in read-only mode")]
    ReadOnly,

    /// Mutation aimed at a provider other than `web`.
    #[error("Only 'web' provider can be updated through the REST API")]
    WrongProvider,

    /// Request body exceeds `web.max_body_bytes`.
    #[error("Request body too large")]
    PayloadTooLarge,

    /// Request body could not be read off the connection.
    #[error("Error reading request body")]
    BodyRead,

    /// Request body is not a configuration document.
    #[error("{0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// Nothing is consuming submitted configurations anymore.
    #[error("Configuration ingestion is unavailable")]
    IngestClosed(#[from] IngestError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::ReadOnly => StatusCode::FORBIDDEN,
            ApiError::WrongProvider | ApiError::BodyRead | ApiError::MalformedPayload(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::IngestClosed(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
