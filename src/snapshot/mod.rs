//! Configuration snapshot subsystem.
//!
//! # Data Flow
//! ```text
//! aggregator builds a new ConfigSnapshot
//!     → store.rs (atomic swap of Arc<ConfigSnapshot>)
//!     → read handlers load() once per request
//!     → drill-down lookups on model.rs types
//! ```
//!
//! # Design Decisions
//! - A published snapshot is never mutated; updates build a new one
//! - Reads are lock-free (`arc-swap`), writers never block readers
//! - Lookups return `Option`; the HTTP layer maps `None` to 404

pub mod model;
pub mod store;

pub use model::{
    Backend, CircuitBreaker, ConfigSnapshot, Frontend, LoadBalancer, MaxConn,
    ProviderConfiguration, Route, Server,
};
pub use store::SnapshotStore;
