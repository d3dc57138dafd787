//! Embedded dashboard single-page app, served under `/dashboard/`.

use axum::{
    body::Body,
    extract::Path,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "src/dashboard/static"]
pub struct DashboardAssets;

const INDEX: &str = "index.html";

/// `GET /dashboard/`
pub async fn serve_index(headers: HeaderMap) -> Response {
    serve_asset(INDEX, &headers)
}

/// `GET /dashboard/{*path}`, path already stripped of the prefix.
pub async fn serve_path(Path(path): Path<String>, headers: HeaderMap) -> Response {
    serve_asset(&asset_name(&path), &headers)
}

/// Map a request path to an embedded file name. Directories get `index.html`.
fn asset_name(path: &str) -> String {
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        INDEX.to_string()
    } else if path.ends_with('/') {
        format!("{path}{INDEX}")
    } else {
        path.to_string()
    }
}

fn serve_asset(name: &str, headers: &HeaderMap) -> Response {
    let Some(file) = DashboardAssets::get(name) else {
        return (StatusCode::NOT_FOUND, "404 page not found").into_response();
    };

    let etag = format!("\"{}\"", hex::encode(file.metadata.sha256_hash()));
    let unchanged = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == etag);

    let mut response = if unchanged {
        StatusCode::NOT_MODIFIED.into_response()
    } else {
        let mime = mime_guess::from_path(name).first_or_octet_stream();
        let mut response = Body::from(file.data.into_owned()).into_response();
        if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
            response.headers_mut().insert(header::CONTENT_TYPE, value);
        }
        response
    };

    if let Ok(value) = HeaderValue::from_str(&etag) {
        response.headers_mut().insert(header::ETAG, value);
    }
    response
}
