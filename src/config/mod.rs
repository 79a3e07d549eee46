//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (REDIS_HOST, FLAKY, ...)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults so both services start with no file at all
//! - The environment always wins over the file

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    DownstreamConfig, FaultConfig, ListenerConfig, ObservabilityConfig, ServiceConfig,
    StoreConfig, TracingConfig,
};
