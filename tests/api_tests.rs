//! Integration tests for the REST API.
//!
//! Requests go through the full middleware stack via `tower::ServiceExt`
//! without a TCP listener.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use config_registry::config::RegistryConfig;
use config_registry::ingest::{self, ConfigAggregator};
use config_registry::lifecycle::Shutdown;
use config_registry::observability::VarRegistry;
use config_registry::snapshot::{ProviderConfiguration, SnapshotStore};
use config_registry::WebServer;
use serde_json::Value;
use tower::ServiceExt;

mod common;

use common::{body_bytes, body_to_json, body_to_string, default_app, test_app, web_payload};

async fn get(router: &Router, uri: &str) -> Response {
    router
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn put(router: &Router, uri: &str, body: impl Into<Body>) -> Response {
    router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::PUT)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.into())
                .unwrap(),
        )
        .await
        .unwrap()
}

fn read_only_config() -> RegistryConfig {
    let mut config = RegistryConfig::default();
    config.web.read_only = true;
    config
}

// =========================================================================
// Reads
// =========================================================================

#[tokio::test]
async fn test_api_and_providers_return_whole_snapshot() {
    let app = default_app();

    for uri in ["/api", "/api/providers"] {
        let response = get(&app.router, uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let json = body_to_json(response.into_body()).await;
        assert!(json["docker"].is_object());
        assert!(json["file"].is_object());
        assert_eq!(json.as_object().unwrap().len(), 2);
    }
}

#[tokio::test]
async fn test_get_provider() {
    let app = default_app();

    let response = get(&app.router, "/api/providers/docker").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["frontends"]["web-frontend"]["backend"], "web-backend");

    let response = get(&app.router, "/api/providers/kubernetes").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_backend_drill_down() {
    let app = default_app();

    let response = get(&app.router, "/api/providers/docker/backends").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert!(json["web-backend"].is_object());

    let response = get(&app.router, "/api/providers/docker/backends/web-backend").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["loadBalancer"]["method"], "wrr");
    assert_eq!(json["servers"]["server-1"]["weight"], 10);

    let response = get(&app.router, "/api/providers/docker/backends/web-backend/servers").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json.as_object().unwrap().len(), 2);

    let response = get(
        &app.router,
        "/api/providers/docker/backends/web-backend/servers/server-2",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json, serde_json::json!({"url": "http://172.17.0.3:80", "weight": 5}));
}

#[tokio::test]
async fn test_frontend_drill_down() {
    let app = default_app();

    let response = get(&app.router, "/api/providers/docker/frontends").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&app.router, "/api/providers/docker/frontends/web-frontend").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["passHostHeader"], true);
    assert_eq!(json["entryPoints"], serde_json::json!(["http"]));

    let response = get(
        &app.router,
        "/api/providers/docker/frontends/web-frontend/routes",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(
        &app.router,
        "/api/providers/docker/frontends/web-frontend/routes/route-host",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["rule"], "Host:web.docker.localhost");
}

#[tokio::test]
async fn test_first_missing_segment_is_404() {
    let app = default_app();

    let missing = [
        "/api/providers/ghost/backends",
        "/api/providers/ghost/frontends",
        "/api/providers/docker/backends/ghost",
        "/api/providers/docker/backends/ghost/servers",
        "/api/providers/docker/backends/ghost/servers/server-1",
        "/api/providers/docker/backends/web-backend/servers/ghost",
        "/api/providers/docker/frontends/ghost",
        "/api/providers/docker/frontends/ghost/routes",
        "/api/providers/docker/frontends/web-frontend/routes/ghost",
        "/api/providers/file/backends/web-backend",
    ];

    for uri in missing {
        let response = get(&app.router, uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body_to_string(response.into_body()).await, "404 page not found");
    }
}

#[tokio::test]
async fn test_repeated_reads_are_byte_identical() {
    let app = default_app();

    for uri in [
        "/api/providers",
        "/api/providers/docker",
        "/api/providers/docker/backends/web-backend/servers",
    ] {
        let first = body_bytes(get(&app.router, uri).await.into_body()).await;
        let second = body_bytes(get(&app.router, uri).await.into_body()).await;
        assert_eq!(first, second, "{uri}");
    }
}

#[tokio::test]
async fn test_reads_follow_store_swaps() {
    let app = default_app();
    app.store.store(
        config_registry::ConfigSnapshot::new()
            .with_provider("consul", ProviderConfiguration::default()),
    );

    let response = get(&app.router, "/api/providers/docker").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = get(&app.router, "/api/providers/consul").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_empty_store_renders_empty_object() {
    let store = Arc::new(SnapshotStore::new());
    let (tx, _rx) = ingest::channel(1);
    let router = WebServer::new(RegistryConfig::default(), store, tx).router();

    let response = get(&router, "/api/providers").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_string(response.into_body()).await, "{}");
}

// =========================================================================
// Writes
// =========================================================================

#[tokio::test]
async fn test_put_web_enqueues_and_returns_snapshot() {
    let mut app = default_app();

    let response = put(
        &app.router,
        "/api/providers/web",
        web_payload().to_string(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    // Not installed yet: the body is the snapshot as it was.
    let json = body_to_json(response.into_body()).await;
    assert!(json["docker"].is_object());
    assert!(json.get("web").is_none());

    let message = app.updates.try_recv().expect("configuration should be queued");
    assert_eq!(message.provider_name, "web");
    let expected: ProviderConfiguration = serde_json::from_value(web_payload()).unwrap();
    assert_eq!(message.configuration, expected);
}

#[tokio::test]
async fn test_put_round_trip_through_aggregator() {
    let store = Arc::new(SnapshotStore::new());
    let (tx, rx) = ingest::channel(4);
    let shutdown = Shutdown::new();
    tokio::spawn(ConfigAggregator::new(Arc::clone(&store), rx).run(shutdown.subscribe()));
    let router = WebServer::new(RegistryConfig::default(), Arc::clone(&store), tx).router();

    let response = put(&router, "/api/providers/web", web_payload().to_string()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let mut installed = None;
    for _ in 0..50 {
        let response = get(&router, "/api/providers/web").await;
        if response.status() == StatusCode::OK {
            installed = Some(body_to_json(response.into_body()).await);
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let installed = installed.expect("web configuration should be installed");

    let submitted: ProviderConfiguration = serde_json::from_value(web_payload()).unwrap();
    let returned: ProviderConfiguration = serde_json::from_value(installed.clone()).unwrap();
    assert_eq!(returned, submitted);
    assert_eq!(
        installed["backends"]["backend-api"]["servers"]["api-2"]["url"],
        "http://10.0.0.11:8080"
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_put_tolerates_unknown_and_missing_fields() {
    let mut app = default_app();

    let response = put(
        &app.router,
        "/api/providers/web",
        r#"{"frontends": {"f": {"backend": "nowhere", "unknownField": 42}}}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let message = app.updates.try_recv().unwrap();
    assert!(message.configuration.backends.is_empty());
    assert_eq!(message.configuration.frontends["f"].backend, "nowhere");
}

#[tokio::test]
async fn test_put_malformed_body_is_400() {
    let mut app = default_app();

    let response = put(&app.router, "/api/providers/web", "{\"backends\": ").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let text = body_to_string(response.into_body()).await;
    assert!(text.contains("EOF while parsing"), "{text}");
    assert!(app.updates.try_recv().is_none());
}

#[tokio::test]
async fn test_put_read_only_is_403_without_effect() {
    let mut app = test_app(read_only_config());
    let before = body_bytes(get(&app.router, "/api/providers/web").await.into_body()).await;

    let response = put(
        &app.router,
        "/api/providers/web",
        web_payload().to_string(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_to_string(response.into_body()).await,
        "REST API is in read-only mode"
    );

    // Read-only wins over parsing: a malformed body is still 403.
    let response = put(&app.router, "/api/providers/web", "{").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    assert!(app.updates.try_recv().is_none());
    let after = body_bytes(get(&app.router, "/api/providers/web").await.into_body()).await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_put_other_provider_is_400_in_any_mode() {
    for config in [RegistryConfig::default(), read_only_config()] {
        let mut app = test_app(config);

        for provider in ["file", "docker", "WEB"] {
            let response = put(
                &app.router,
                &format!("/api/providers/{provider}"),
                web_payload().to_string(),
            )
            .await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{provider}");
            assert_eq!(
                body_to_string(response.into_body()).await,
                "Only 'web' provider can be updated through the REST API"
            );
        }
        assert!(app.updates.try_recv().is_none());
    }
}

#[tokio::test]
async fn test_put_oversized_body_checks_target_and_mode_first() {
    let oversized = |config: &RegistryConfig| vec![b' '; config.web.max_body_bytes + 1];

    let config = RegistryConfig::default();
    let body = oversized(&config);
    let mut app = test_app(config);
    let response = put(&app.router, "/api/providers/file", body.clone()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let response = put(&app.router, "/api/providers/web", body).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.updates.try_recv().is_none());

    let config = read_only_config();
    let body = oversized(&config);
    let mut app = test_app(config);
    let response = put(&app.router, "/api/providers/web", body.clone()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = put(&app.router, "/api/providers/file", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.updates.try_recv().is_none());
}

#[tokio::test]
async fn test_put_null_fields_take_defaults() {
    let mut app = default_app();

    for payload in [
        r#"{"backends": null}"#,
        r#"{"backends": {"b1": {"servers": {"s1": {"url": "http://10.0.0.1:80", "weight": null}}}}}"#,
        "null",
    ] {
        let response = put(&app.router, "/api/providers/web", payload).await;
        assert_eq!(response.status(), StatusCode::OK, "{payload}");
        assert!(app.updates.try_recv().is_some(), "{payload}");
    }
}

#[tokio::test]
async fn test_put_with_aggregator_gone_is_503() {
    let store = Arc::new(SnapshotStore::new());
    let (tx, rx) = ingest::channel(1);
    drop(rx);
    let router = WebServer::new(RegistryConfig::default(), store, tx).router();

    let response = put(&router, "/api/providers/web", "{}").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// =========================================================================
// Dashboard, health, debug
// =========================================================================

#[tokio::test]
async fn test_root_redirects_to_dashboard() {
    let app = default_app();

    let response = get(&app.router, "/").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/dashboard/");
}

#[tokio::test]
async fn test_dashboard_assets() {
    let app = default_app();

    let response = get(&app.router, "/dashboard/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.contains("text/html"));
    let etag = response.headers()[header::ETAG].clone();

    let response = get(&app.router, "/dashboard/app.js").await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.contains("javascript"));

    let response = get(&app.router, "/dashboard/missing.js").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::get("/dashboard/")
                .header(header::IF_NONE_MATCH, etag)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
}

#[tokio::test]
async fn test_health_reports_request_counts() {
    let app = default_app();

    get(&app.router, "/api/providers").await;
    get(&app.router, "/api/providers/ghost").await;

    let response = get(&app.router, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["total_count"], 2);
    assert_eq!(json["total_status_code_count"]["200"], 1);
    assert_eq!(json["total_status_code_count"]["404"], 1);
    assert_eq!(json["pid"], std::process::id());
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = default_app();

    let response = get(&app.router, "/api").await;
    let id = response.headers()["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());

    let response = app
        .router
        .clone()
        .oneshot(
            Request::get("/api")
                .header("x-request-id", "client-chosen")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "client-chosen");
}

#[tokio::test]
async fn test_debug_vars_hidden_without_debug() {
    let app = default_app();

    let response = get(&app.router, "/debug/vars").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_debug_vars_with_debug() {
    let mut config = RegistryConfig::default();
    config.debug = true;
    let app = test_app(config);

    let response = get(&app.router, "/debug/vars").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json; charset=utf-8"
    );
    let json = body_to_json(response.into_body()).await;
    assert!(json["Goroutines"].is_u64());
    assert!(json["cmdline"].is_array());
}

#[tokio::test]
async fn test_debug_vars_custom_registry() {
    let vars = Arc::new(VarRegistry::new());
    vars.publish("config_version", || Value::from(7)).unwrap();
    vars.publish("build", || Value::from("test")).unwrap();

    let mut config = RegistryConfig::default();
    config.debug = true;
    let store = Arc::new(SnapshotStore::new());
    let (tx, _rx) = ingest::channel(1);
    let router = WebServer::new(config, store, tx).with_vars(vars).router();

    let response = get(&router, "/debug/vars").await;
    assert_eq!(
        body_to_string(response.into_body()).await,
        "{\n\"build\": \"test\",\n\"config_version\": 7\n}\n"
    );
}
