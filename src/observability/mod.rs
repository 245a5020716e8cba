//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Decision engine and adapters produce:
//!     → logging.rs (structured log events at every decision point)
//!     → metrics.rs (probe, transition and active-role metrics)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Log content never feeds back into decisions
//! - Metrics are optional and off by default

pub mod logging;
pub mod metrics;
