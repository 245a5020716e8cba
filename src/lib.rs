//! Single-host link failover controller library.

pub mod config;
pub mod connection;
pub mod error;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod workflow;

pub use config::FailoverConfig;
pub use connection::{ConnectionManager, ConnectionState, ConnectionType};
pub use error::{FailoverError, FailoverResult};
pub use lifecycle::Shutdown;
pub use workflow::{Workflow, WorkflowOptions, WorkflowState};
