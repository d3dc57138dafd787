//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! web.address
//!     → TcpListener::bind (failure is fatal to the process)
//!     → tls.rs (when cert_file and key_file are both set)
//!     → Hand off to HTTP layer
//! ```

pub mod tls;

pub use tls::{load_tls_config, TlsError};
