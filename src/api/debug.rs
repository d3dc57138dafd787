//! `/debug/vars`: streamed dump of the process variable registry.

use std::convert::Infallible;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use futures_util::stream;

use crate::http::server::AppState;

pub async fn get_debug_vars(State(state): State<AppState>) -> Response {
    let chunks = state
        .vars
        .chunks()
        .map(|chunk| Ok::<_, Infallible>(Bytes::from(chunk)));

    (
        [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
        Body::from_stream(stream::iter(chunks)),
    )
        .into_response()
}
