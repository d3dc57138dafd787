//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every HTTP response
//!     → stats.rs middleware (status counts, latency)
//!     → metrics.rs (Prometheus counters, histograms)
//!
//! Consumers:
//!     → GET /health        (stats.rs snapshot)
//!     → GET /debug/vars    (expvar.rs registry, debug only)
//!     → Prometheus scrape  (optional exporter)
//!     → logging.rs         (stdout, text or JSON)
//! ```

pub mod expvar;
pub mod logging;
pub mod metrics;
pub mod stats;

pub use expvar::{VarError, VarRegistry};
pub use stats::{RequestStats, StatsData};
