//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Probe or OS command:
//!     → timeouts.rs (every command has a deadline)
//!     → On failure: retries.rs (bounded attempts, backoff.rs between them)
//!     → Final verdict handed to the decision engine
//! ```
//!
//! # Design Decisions
//! - Retries are absorbed below the engine; the engine never retries
//! - Constant backoff by default, exponential with jitter on request

pub mod backoff;
pub mod retries;
pub mod timeouts;

pub use backoff::Backoff;
pub use retries::{AttemptContext, RetryPolicy};
