//! Configuration ingest subsystem.
//!
//! # Data Flow
//! ```text
//! PUT /api/providers/web
//!     → channel.rs (bounded mpsc, waits when full)
//!     → aggregator.rs (skip unchanged, rebuild snapshot)
//!     → SnapshotStore::update (atomic swap)
//! ```
//!
//! # Design Decisions
//! - Producers never touch the store; the aggregator is the only writer
//! - Submission is fire-and-forget: a read right after a PUT may be stale

pub mod aggregator;
pub mod channel;

pub use aggregator::ConfigAggregator;
pub use channel::{channel, ConfigMessage, IngestError, IngestReceiver, IngestSender};
