//! Link model and the connection-manager port.
//!
//! # Data Flow
//! ```text
//! Workflow (decision engine)
//!     → ConnectionManager::is_connection_healthy (one probe per role, concurrently)
//!     ← ConnectionHealthyResult (healthy flag + probe latency)
//!     → ConnectionManager::set_priority (one command per ranked role, concurrently)
//!     → nmcli.rs translates rank → route metric on the OS
//! ```
//!
//! # Design Decisions
//! - The engine only ever sees a final healthy/unhealthy verdict; retries live below the port
//! - Probing fails only for unknown roles, never to signal "unhealthy"
//! - Ranks are zero-based ordinals; absolute metrics are the adapter's business

pub mod command;
pub mod nmcli;

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::FailoverResult;

pub use nmcli::NmcliConnectionManager;

/// Configured role of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConnectionType {
    Primary,
    Backup,
    Fallback,
    None,
}

impl ConnectionType {
    /// Standby roles take part in the latency tie-break.
    pub fn is_standby(self) -> bool {
        matches!(self, ConnectionType::Backup | ConnectionType::Fallback)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionType::Primary => "PRIMARY",
            ConnectionType::Backup => "BACKUP",
            ConnectionType::Fallback => "FALLBACK",
            ConnectionType::None => "NONE",
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role currently carrying the preferred route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConnectionState {
    /// Initial state, and the state after a revert on total outage.
    #[default]
    None,
    Primary,
    Backup,
    Fallback,
}

impl ConnectionState {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionState::None => "NONE",
            ConnectionState::Primary => "PRIMARY",
            ConnectionState::Backup => "BACKUP",
            ConnectionState::Fallback => "FALLBACK",
        }
    }

    /// True while traffic runs over a standby link or no link at all.
    pub fn is_degraded(self) -> bool {
        self != ConnectionState::Primary
    }
}

impl From<ConnectionType> for ConnectionState {
    fn from(connection_type: ConnectionType) -> Self {
        match connection_type {
            ConnectionType::Primary => ConnectionState::Primary,
            ConnectionType::Backup => ConnectionState::Backup,
            ConnectionType::Fallback => ConnectionState::Fallback,
            ConnectionType::None => ConnectionState::None,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one (retried) probe. Created fresh every cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionHealthyResult {
    pub connection_type: ConnectionType,
    pub healthy: bool,
    /// Wall-clock time the probe took, retries included.
    pub check_resolved_in: Duration,
}

impl ConnectionHealthyResult {
    pub fn new(connection_type: ConnectionType, healthy: bool, check_resolved_in: Duration) -> Self {
        Self {
            connection_type,
            healthy,
            check_resolved_in,
        }
    }
}

/// Command assigning a zero-based rank to a link (0 = most preferred).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionPriority {
    pub connection_type: ConnectionType,
    pub priority: usize,
}

/// Capability the decision engine needs from the host.
pub trait ConnectionManager: Send + Sync {
    /// Probe a link. Fails only when the role is not managed.
    fn is_connection_healthy(
        &self,
        connection_type: ConnectionType,
    ) -> impl Future<Output = FailoverResult<ConnectionHealthyResult>> + Send;

    /// Apply a routing rank to a link.
    fn set_priority(
        &self,
        priority: ConnectionPriority,
    ) -> impl Future<Output = FailoverResult<()>> + Send;
}

impl<T: ConnectionManager> ConnectionManager for Arc<T> {
    fn is_connection_healthy(
        &self,
        connection_type: ConnectionType,
    ) -> impl Future<Output = FailoverResult<ConnectionHealthyResult>> + Send {
        (**self).is_connection_healthy(connection_type)
    }

    fn set_priority(
        &self,
        priority: ConnectionPriority,
    ) -> impl Future<Output = FailoverResult<()>> + Send {
        (**self).set_priority(priority)
    }
}
