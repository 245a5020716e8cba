//! Process lifecycle: startup wiring, signals and shutdown.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config (already validated) → Metrics → Adapter → Engine → Watcher → Monitor
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Monitor finishes its cycle → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger(signal name)
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then adapter, then the monitor loop
//! - An in-flight cycle is never interrupted

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownReceiver};
