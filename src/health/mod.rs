//! Link health scheduling.
//!
//! # Data Flow
//! ```text
//! monitor.rs:
//!     Timer (interval depends on the active role)
//!     → Workflow::handler (probe all links, decide, apply)
//!     → Sleep until next cycle or shutdown
//! ```
//!
//! # Design Decisions
//! - Probing more often while degraded shortens time-to-failback
//! - Configuration is re-read each cycle from a watch channel

pub mod monitor;

pub use monitor::{next_interval, LinkMonitor};
