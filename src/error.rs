//! Error definitions for the failover controller.

use std::time::Duration;
use thiserror::Error;

use crate::connection::ConnectionType;

/// Errors that can occur while probing links or reassigning their priority.
#[derive(Debug, Error)]
pub enum FailoverError {
    /// Role is not managed by this host (not configured, or `NONE`).
    #[error("Check the provided connection. Some connections are not enabled or managed through nmcli. (connection: {connection_type})")]
    UnknownConnectionLink { connection_type: ConnectionType },

    /// NetworkManager has no active profile for the interface.
    #[error("We couldn't get the UUID for connection {connection_name} (stdout: {stdout:?}, stderr: {stderr:?})")]
    UnableToGetIfaceUuid {
        connection_name: String,
        stdout: String,
        stderr: String,
    },

    /// A single probe attempt failed.
    #[error("Connectivity check failed for {connection_type} on attempt {attempt}")]
    ConnectivityCheckFailed {
        connection_type: ConnectionType,
        attempt: u32,
    },

    /// An OS command exited with a non-zero status.
    #[error("Command `{command}` failed with code {code:?}: {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// An OS command did not finish within its deadline.
    #[error("`{command}` timed out after {after:?}")]
    Timeout { command: String, after: Duration },

    /// Spawning a command failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for failover operations.
pub type FailoverResult<T> = Result<T, FailoverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FailoverError::UnknownConnectionLink {
            connection_type: ConnectionType::Fallback,
        };
        assert!(err.to_string().contains("FALLBACK"));
        assert!(err.to_string().contains("nmcli"));

        let err = FailoverError::Timeout {
            command: "nmcli device reapply eth0".into(),
            after: Duration::from_secs(10),
        };
        assert_eq!(err.to_string(), "`nmcli device reapply eth0` timed out after 10s");
    }
}
