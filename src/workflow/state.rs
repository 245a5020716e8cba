//! Engine memory: which role currently carries the preferred route.
//!
//! # Design Decisions
//! - Owned by the `Workflow`; nothing else holds a mutable handle
//! - Lives for the process lifetime, never persisted (restart = NONE)
//! - The active role is only ever a role reported healthy when it was chosen

use crate::connection::{ConnectionState, ConnectionType};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowState {
    current: ConnectionState,
    // indexed by `slot`
    healthy: [bool; 4],
}

fn slot(connection_type: ConnectionType) -> usize {
    match connection_type {
        ConnectionType::Primary => 0,
        ConnectionType::Backup => 1,
        ConnectionType::Fallback => 2,
        ConnectionType::None => 3,
    }
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State already settled on `connection_type`, as after a previous transition.
    pub fn with_main_connection(connection_type: ConnectionType) -> Self {
        let mut state = Self::new();
        state.set_main_connection(connection_type);
        state
    }

    pub fn current(&self) -> ConnectionState {
        self.current
    }

    /// Health last recorded for a role when it became the main connection.
    pub fn is_healthy(&self, connection_type: ConnectionType) -> bool {
        self.healthy[slot(connection_type)]
    }

    /// Make `connection_type` the active role and mark it healthy.
    pub fn set_main_connection(&mut self, connection_type: ConnectionType) {
        self.current = ConnectionState::from(connection_type);
        self.healthy[slot(connection_type)] = true;
    }

    /// Back to the initial state.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_none() {
        let state = WorkflowState::new();
        assert_eq!(state.current(), ConnectionState::None);
        assert!(!state.is_healthy(ConnectionType::Primary));
    }

    #[test]
    fn test_set_main_connection() {
        let mut state = WorkflowState::new();
        state.set_main_connection(ConnectionType::Backup);
        assert_eq!(state.current(), ConnectionState::Backup);
        assert!(state.is_healthy(ConnectionType::Backup));
        assert!(!state.is_healthy(ConnectionType::Primary));

        state.set_main_connection(ConnectionType::Primary);
        assert_eq!(state.current(), ConnectionState::Primary);
        // previous flags are kept
        assert!(state.is_healthy(ConnectionType::Backup));
    }

    #[test]
    fn test_reset() {
        let mut state = WorkflowState::with_main_connection(ConnectionType::Fallback);
        state.reset();
        assert_eq!(state, WorkflowState::new());
    }
}
