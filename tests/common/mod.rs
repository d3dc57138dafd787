//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::Router;
use config_registry::config::RegistryConfig;
use config_registry::ingest::{self, IngestReceiver};
use config_registry::snapshot::{
    Backend, ConfigSnapshot, Frontend, LoadBalancer, ProviderConfiguration, Route, Server,
    SnapshotStore,
};
use config_registry::WebServer;
use serde_json::Value;

/// Snapshot with provider "docker" holding backend "web-backend" (two
/// servers) and frontend "web-frontend" (one route), plus an empty "file".
pub fn docker_snapshot() -> ConfigSnapshot {
    let mut backend = Backend {
        load_balancer: Some(LoadBalancer {
            method: "wrr".into(),
            sticky: false,
        }),
        ..Backend::default()
    };
    backend.servers.insert(
        "server-1".into(),
        Server {
            url: "http://172.17.0.2:80".into(),
            weight: 10,
        },
    );
    backend.servers.insert(
        "server-2".into(),
        Server {
            url: "http://172.17.0.3:80".into(),
            weight: 5,
        },
    );

    let mut frontend = Frontend {
        backend: "web-backend".into(),
        entry_points: vec!["http".into()],
        pass_host_header: true,
        ..Frontend::default()
    };
    frontend.routes.insert(
        "route-host".into(),
        Route {
            rule: "Host:web.docker.localhost".into(),
        },
    );

    let mut docker = ProviderConfiguration::default();
    docker.backends.insert("web-backend".into(), backend);
    docker.frontends.insert("web-frontend".into(), frontend);

    ConfigSnapshot::new()
        .with_provider("docker", docker)
        .with_provider("file", ProviderConfiguration::default())
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<SnapshotStore>,
    pub updates: IngestReceiver,
}

/// Router over a store preloaded with [`docker_snapshot`].
pub fn test_app(config: RegistryConfig) -> TestApp {
    let store = Arc::new(SnapshotStore::with_snapshot(docker_snapshot()));
    let (tx, updates) = ingest::channel(config.ingest.capacity);
    let router = WebServer::new(config, Arc::clone(&store), tx).router();
    TestApp {
        router,
        store,
        updates,
    }
}

pub fn default_app() -> TestApp {
    test_app(RegistryConfig::default())
}

pub async fn body_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX).await.unwrap().to_vec()
}

pub async fn body_to_json(body: Body) -> Value {
    serde_json::from_slice(&body_bytes(body).await).unwrap()
}

pub async fn body_to_string(body: Body) -> String {
    String::from_utf8(body_bytes(body).await).unwrap()
}

/// A configuration the way a client would submit it for the web provider.
pub fn web_payload() -> Value {
    serde_json::json!({
        "backends": {
            "backend-api": {
                "servers": {
                    "api-1": {"url": "http://10.0.0.10:8080", "weight": 1},
                    "api-2": {"url": "http://10.0.0.11:8080", "weight": 3}
                },
                "circuitBreaker": {"expression": "NetworkErrorRatio() > 0.5"}
            }
        },
        "frontends": {
            "frontend-api": {
                "backend": "backend-api",
                "routes": {"path": {"rule": "PathPrefix:/api"}},
                "priority": 10
            }
        }
    })
}
