//! Configuration data model.
//!
//! All entities deserialize leniently: missing or `null` fields take their
//! defaults and unknown fields are ignored. Maps are `BTreeMap` so serialization order is
//! stable and repeated reads of one snapshot render identical bytes.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

/// Read `null` the same as an absent field.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single endpoint inside a backend pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Server {
    #[serde(deserialize_with = "null_default")]
    pub url: String,
    #[serde(deserialize_with = "null_default")]
    pub weight: i64,
}

/// Load balancing settings for a backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoadBalancer {
    #[serde(deserialize_with = "null_default")]
    pub method: String,
    #[serde(deserialize_with = "null_default")]
    pub sticky: bool,
}

/// Circuit breaker trigger expression for a backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CircuitBreaker {
    #[serde(deserialize_with = "null_default")]
    pub expression: String,
}

/// Connection cap for a backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MaxConn {
    #[serde(deserialize_with = "null_default")]
    pub amount: i64,
    #[serde(deserialize_with = "null_default")]
    pub extractor_func: String,
}

/// A named pool of servers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Backend {
    #[serde(deserialize_with = "null_default")]
    pub servers: BTreeMap<String, Server>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_balancer: Option<LoadBalancer>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub circuit_breaker: Option<CircuitBreaker>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_conn: Option<MaxConn>,
}

impl Backend {
    pub fn server(&self, id: &str) -> Option<&Server> {
        self.servers.get(id)
    }
}

/// A matching rule, e.g. `Host:example.com` or `PathPrefix:/api`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Route {
    #[serde(deserialize_with = "null_default")]
    pub rule: String,
}

/// A named entry point with its routes.
///
/// `backend` names a backend of the same provider. The reference is weak: it
/// is never checked on write and may point at a backend that does not exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Frontend {
    #[serde(deserialize_with = "null_default")]
    pub entry_points: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub backend: String,
    #[serde(deserialize_with = "null_default")]
    pub routes: BTreeMap<String, Route>,
    #[serde(deserialize_with = "null_default")]
    pub pass_host_header: bool,
    #[serde(deserialize_with = "null_default")]
    pub priority: i64,
}

impl Frontend {
    pub fn route(&self, id: &str) -> Option<&Route> {
        self.routes.get(id)
    }
}

/// Everything a single provider contributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderConfiguration {
    #[serde(deserialize_with = "null_default")]
    pub backends: BTreeMap<String, Backend>,
    #[serde(deserialize_with = "null_default")]
    pub frontends: BTreeMap<String, Frontend>,
}

impl ProviderConfiguration {
    /// Parse a configuration from a JSON document. A bare `null` document
    /// is an empty configuration.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        Ok(serde_json::from_slice::<Option<Self>>(bytes)?.unwrap_or_default())
    }

    pub fn backend(&self, id: &str) -> Option<&Backend> {
        self.backends.get(id)
    }

    pub fn frontend(&self, id: &str) -> Option<&Frontend> {
        self.frontends.get(id)
    }
}

/// Point-in-time view of every provider's configuration.
///
/// Provider configurations sit behind `Arc` so that building the next
/// snapshot only clones the map, not the configurations it holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ConfigSnapshot {
    providers: BTreeMap<String, Arc<ProviderConfiguration>>,
}

impl ConfigSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of this snapshot with `id` set to `configuration`.
    pub fn with_provider(
        mut self,
        id: impl Into<String>,
        configuration: impl Into<Arc<ProviderConfiguration>>,
    ) -> Self {
        self.providers.insert(id.into(), configuration.into());
        self
    }

    pub fn provider(&self, id: &str) -> Option<&ProviderConfiguration> {
        self.providers.get(id).map(Arc::as_ref)
    }

    pub fn providers(&self) -> impl Iterator<Item = (&str, &ProviderConfiguration)> {
        self.providers.iter().map(|(id, cfg)| (id.as_str(), cfg.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
