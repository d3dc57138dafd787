//! Read handlers.
//!
//! Every handler loads the snapshot exactly once and resolves its path
//! segments against that one view. The first missing segment ends the
//! request with 404.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::api::error::ApiError;
use crate::http::server::AppState;
use crate::observability::StatsData;

type ApiResult = Result<Response, ApiError>;

fn found<T: serde::Serialize>(value: Option<&T>) -> ApiResult {
    value
        .map(|value| Json(value).into_response())
        .ok_or(ApiError::NotFound)
}

pub async fn get_health(State(state): State<AppState>) -> Json<StatsData> {
    Json(state.stats.data())
}

/// Whole snapshot, every provider.
pub async fn get_config(State(state): State<AppState>) -> Response {
    let snapshot = state.store.load();
    Json(&*snapshot).into_response()
}

pub async fn get_provider(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> ApiResult {
    let snapshot = state.store.load();
    found(snapshot.provider(&provider))
}

pub async fn get_backends(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> ApiResult {
    let snapshot = state.store.load();
    found(snapshot.provider(&provider).map(|cfg| &cfg.backends))
}

pub async fn get_backend(
    State(state): State<AppState>,
    Path((provider, backend)): Path<(String, String)>,
) -> ApiResult {
    let snapshot = state.store.load();
    found(
        snapshot
            .provider(&provider)
            .and_then(|cfg| cfg.backend(&backend)),
    )
}

pub async fn get_servers(
    State(state): State<AppState>,
    Path((provider, backend)): Path<(String, String)>,
) -> ApiResult {
    let snapshot = state.store.load();
    found(
        snapshot
            .provider(&provider)
            .and_then(|cfg| cfg.backend(&backend))
            .map(|backend| &backend.servers),
    )
}

pub async fn get_server(
    State(state): State<AppState>,
    Path((provider, backend, server)): Path<(String, String, String)>,
) -> ApiResult {
    let snapshot = state.store.load();
    found(
        snapshot
            .provider(&provider)
            .and_then(|cfg| cfg.backend(&backend))
            .and_then(|backend| backend.server(&server)),
    )
}

pub async fn get_frontends(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> ApiResult {
    let snapshot = state.store.load();
    found(snapshot.provider(&provider).map(|cfg| &cfg.frontends))
}

pub async fn get_frontend(
    State(state): State<AppState>,
    Path((provider, frontend)): Path<(String, String)>,
) -> ApiResult {
    let snapshot = state.store.load();
    found(
        snapshot
            .provider(&provider)
            .and_then(|cfg| cfg.frontend(&frontend)),
    )
}

pub async fn get_routes(
    State(state): State<AppState>,
    Path((provider, frontend)): Path<(String, String)>,
) -> ApiResult {
    let snapshot = state.store.load();
    found(
        snapshot
            .provider(&provider)
            .and_then(|cfg| cfg.frontend(&frontend))
            .map(|frontend| &frontend.routes),
    )
}

pub async fn get_route(
    State(state): State<AppState>,
    Path((provider, frontend, route)): Path<(String, String, String)>,
) -> ApiResult {
    let snapshot = state.store.load();
    found(
        snapshot
            .provider(&provider)
            .and_then(|cfg| cfg.frontend(&frontend))
            .and_then(|frontend| frontend.route(&route)),
    )
}

pub async fn redirect_to_dashboard() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/dashboard/")])
}
