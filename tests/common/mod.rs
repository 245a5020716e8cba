//! Shared utilities for workflow and monitor tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Barrier;

use link_failover::config::FailoverConfig;
use link_failover::connection::{
    ConnectionHealthyResult, ConnectionManager, ConnectionPriority, ConnectionType,
};
use link_failover::{FailoverError, FailoverResult, Workflow, WorkflowOptions, WorkflowState};

/// Scriptable connection manager that records every priority command.
#[derive(Debug, Default)]
pub struct FakeConnectionManager {
    health: Mutex<HashMap<ConnectionType, (bool, Duration)>>,
    priorities: Mutex<Vec<ConnectionPriority>>,
    failing: Mutex<HashSet<ConnectionType>>,
    unmanaged: Mutex<HashSet<ConnectionType>>,
    probes: AtomicUsize,
    probe_gate: Mutex<Option<Arc<Barrier>>>,
    priority_gate: Mutex<Option<Arc<Barrier>>>,
}

impl FakeConnectionManager {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_health(&self, connection_type: ConnectionType, healthy: bool, latency_ms: u64) {
        self.health
            .lock()
            .unwrap()
            .insert(connection_type, (healthy, Duration::from_millis(latency_ms)));
    }

    /// Make `set_priority` fail for a role.
    pub fn fail_priority_for(&self, connection_type: ConnectionType) {
        self.failing.lock().unwrap().insert(connection_type);
    }

    pub fn clear_failures(&self) {
        self.failing.lock().unwrap().clear();
    }

    /// Make probing a role a configuration error.
    pub fn unmanage(&self, connection_type: ConnectionType) {
        self.unmanaged.lock().unwrap().insert(connection_type);
    }

    pub fn manage_all(&self) {
        self.unmanaged.lock().unwrap().clear();
    }

    /// Priority commands issued so far, ordered by rank.
    pub fn take_priorities(&self) -> Vec<(ConnectionType, usize)> {
        let mut issued: Vec<_> = self
            .priorities
            .lock()
            .unwrap()
            .drain(..)
            .map(|p| (p.connection_type, p.priority))
            .collect();
        issued.sort_by_key(|(_, priority)| *priority);
        issued
    }

    /// Hold every probe until `n` probes are in flight at once.
    pub fn gate_probes(&self, n: usize) {
        *self.probe_gate.lock().unwrap() = Some(Arc::new(Barrier::new(n)));
    }

    /// Hold every priority command until `n` of them are in flight at once.
    pub fn gate_priorities(&self, n: usize) {
        *self.priority_gate.lock().unwrap() = Some(Arc::new(Barrier::new(n)));
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

impl ConnectionManager for FakeConnectionManager {
    async fn is_connection_healthy(
        &self,
        connection_type: ConnectionType,
    ) -> FailoverResult<ConnectionHealthyResult> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        let gate = self.probe_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.wait().await;
        }
        if self.unmanaged.lock().unwrap().contains(&connection_type) {
            return Err(FailoverError::UnknownConnectionLink { connection_type });
        }
        let (healthy, latency) = self
            .health
            .lock()
            .unwrap()
            .get(&connection_type)
            .copied()
            .unwrap_or((false, Duration::ZERO));
        Ok(ConnectionHealthyResult::new(connection_type, healthy, latency))
    }

    async fn set_priority(&self, priority: ConnectionPriority) -> FailoverResult<()> {
        self.priorities.lock().unwrap().push(priority);
        let gate = self.priority_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.wait().await;
        }
        if self.failing.lock().unwrap().contains(&priority.connection_type) {
            return Err(FailoverError::CommandFailed {
                command: format!("nmcli connection modify {}", priority.connection_type),
                code: Some(10),
                stderr: "Error: unknown connection".into(),
            });
        }
        Ok(())
    }
}

pub fn workflow(
    manager: &Arc<FakeConnectionManager>,
    initial: ConnectionType,
) -> Workflow<Arc<FakeConnectionManager>> {
    workflow_with_options(manager, initial, WorkflowOptions::default())
}

pub fn workflow_with_options(
    manager: &Arc<FakeConnectionManager>,
    initial: ConnectionType,
    options: WorkflowOptions,
) -> Workflow<Arc<FakeConnectionManager>> {
    let state = if initial == ConnectionType::None {
        WorkflowState::new()
    } else {
        WorkflowState::with_main_connection(initial)
    };
    Workflow::with_state(manager.clone(), state, options)
}

/// Minimal valid configuration for monitor tests.
pub fn config(fallback: bool) -> FailoverConfig {
    let mut config = FailoverConfig::default();
    config.links.primary = "eth0".into();
    config.links.backup = "wlan0".into();
    if fallback {
        config.links.fallback = Some("usb0".into());
    }
    config.intervals.primary_active_secs = 30;
    config.intervals.standby_active_secs = 5;
    config
}
