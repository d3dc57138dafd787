//! REST API routes.
//!
//! ```text
//! GET  /health
//! GET  /api, /api/providers
//! GET  /api/providers/{provider}
//! PUT  /api/providers/{provider}                  (web only)
//! GET  /api/providers/{provider}/backends[/{backend}[/servers[/{server}]]]
//! GET  /api/providers/{provider}/frontends[/{frontend}[/routes[/{route}]]]
//! GET  /                                          → 302 /dashboard/
//! GET  /dashboard/*
//! GET  /debug/vars                                (debug only)
//! ```

pub mod debug;
pub mod error;
pub mod handlers;
pub mod write;

use axum::{routing::get, Router};

use self::debug::get_debug_vars;
use self::handlers::*;
use self::write::put_provider;
use crate::dashboard;
use crate::http::server::AppState;

pub use error::ApiError;
pub use write::WEB_PROVIDER;

pub fn setup_api_router(state: AppState, debug: bool) -> Router {
    let mut router = Router::new()
        .route("/health", get(get_health))
        .route("/api", get(get_config))
        .route("/api/providers", get(get_config))
        .route(
            "/api/providers/{provider}",
            get(get_provider).put(put_provider),
        )
        .route("/api/providers/{provider}/backends", get(get_backends))
        .route(
            "/api/providers/{provider}/backends/{backend}",
            get(get_backend),
        )
        .route(
            "/api/providers/{provider}/backends/{backend}/servers",
            get(get_servers),
        )
        .route(
            "/api/providers/{provider}/backends/{backend}/servers/{server}",
            get(get_server),
        )
        .route("/api/providers/{provider}/frontends", get(get_frontends))
        .route(
            "/api/providers/{provider}/frontends/{frontend}",
            get(get_frontend),
        )
        .route(
            "/api/providers/{provider}/frontends/{frontend}/routes",
            get(get_routes),
        )
        .route(
            "/api/providers/{provider}/frontends/{frontend}/routes/{route}",
            get(get_route),
        )
        .route("/", get(redirect_to_dashboard))
        .route("/dashboard/", get(dashboard::serve_index))
        .route("/dashboard/{*path}", get(dashboard::serve_path));

    if debug {
        router = router.route("/debug/vars", get(get_debug_vars));
    }

    router.with_state(state)
}
