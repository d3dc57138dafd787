//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Store + ingest channel → Aggregator → Server task
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Server drains → Aggregator stops → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: bind or TLS errors end the process with a non-zero status
//! - The server is spawned so the caller wiring it up is not blocked

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::{spawn_signal_handler, wait_for_signal};
