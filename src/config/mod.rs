//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse, deserialize, PRIMARY/BACKUP/FALLBACK_CONNECTION overrides)
//!     → validation.rs (link names, URLs, intervals, addresses)
//!     → FailoverConfig
//!
//! On file change:
//!     watcher.rs sees a write or rename in the config directory
//!     → loader.rs + validation.rs, rejected edits are logged and dropped
//!     → published to the adapter (arc-swap) and the monitor (watch channel)
//! ```
//!
//! # Design Decisions
//! - A reload replaces the whole config, never individual fields
//! - Everything but the link names has a default
//! - Every validation problem is reported at once, not just the first

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::FailoverConfig;
pub use schema::{
    IntervalConfig, LinksConfig, ObservabilityConfig, ProbeConfig, RetryConfig, RoutingConfig,
    WorkflowConfig,
};
