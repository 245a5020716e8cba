//! Failover decision engine.
//!
//! # Data Flow
//! ```text
//! Scheduler tick
//!     → engine.rs probes every configured link (concurrently)
//!     → all down? log, keep state (or revert to NONE when configured)
//!     → strategy.rs picks Keep or Switch(order) from the current state
//!     → sort.rs applies the latency tie-break among standby links
//!     → engine.rs issues rank 0..n as one concurrent batch
//!     → state.rs records the first healthy role as the main connection
//! ```
//!
//! # State Machine
//! ```text
//! NONE     → PRIMARY                 primary healthy
//! NONE     → BACKUP | FALLBACK       primary down, fastest healthy standby
//! PRIMARY  → BACKUP | FALLBACK       primary down, a standby healthy
//! BACKUP   → PRIMARY                 primary healthy
//! BACKUP   → FALLBACK                primary and backup down, fallback healthy
//! FALLBACK → PRIMARY                 primary healthy
//! FALLBACK → BACKUP                  primary and fallback down, backup healthy
//! ```
//!
//! # Design Decisions
//! - No terminal state; every cycle re-evaluates from fresh probes
//! - Fail-back to primary is unconditional whenever it is healthy
//! - Total outage is a valid operating state, not an error

pub mod engine;
pub mod sort;
pub mod state;
pub mod strategy;

pub use engine::{Workflow, WorkflowOptions};
pub use sort::sorted_connection_check;
pub use state::WorkflowState;
pub use strategy::{CycleChecks, KeepReason, Plan, SwitchReason};
