//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → command-line overrides (main.rs)
//!     → RegistryConfig (immutable for the process lifetime)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; read-only and debug cannot be toggled
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{IngestConfig, ObservabilityConfig, RegistryConfig, TimeoutConfig, WebConfig};
pub use validation::{validate_config, ValidationError};
