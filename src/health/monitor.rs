//! Periodic failover cycles.
//!
//! # Responsibilities
//! - Run one decision cycle immediately, then one per interval
//! - Pick the interval from the active role (faster while degraded)
//! - Pick up reloaded configuration between cycles
//!
//! # Design Decisions
//! - Cycles never overlap; the next one is scheduled after the previous settles
//! - A failed cycle is logged and the loop keeps going
//! - Shutdown is only observed between cycles, an in-flight cycle always completes

use std::time::Duration;

use tokio::sync::watch;

use crate::config::schema::{FailoverConfig, IntervalConfig};
use crate::connection::{ConnectionManager, ConnectionState, ConnectionType};
use crate::error::FailoverResult;
use crate::lifecycle::ShutdownReceiver;
use crate::observability::metrics;
use crate::workflow::{Workflow, WorkflowOptions};

/// Interval until the next cycle for a given active role.
pub fn next_interval(active: ConnectionState, intervals: &IntervalConfig) -> Duration {
    if active.is_degraded() {
        Duration::from_secs(intervals.standby_active_secs)
    } else {
        Duration::from_secs(intervals.primary_active_secs)
    }
}

/// Drives the decision engine on a timer.
pub struct LinkMonitor<M> {
    workflow: Workflow<M>,
    config: watch::Receiver<FailoverConfig>,
}

impl<M: ConnectionManager> LinkMonitor<M> {
    pub fn new(workflow: Workflow<M>, config: watch::Receiver<FailoverConfig>) -> Self {
        Self { workflow, config }
    }

    pub fn workflow(&self) -> &Workflow<M> {
        &self.workflow
    }

    /// Run a single cycle with the latest configuration.
    pub async fn run_cycle(&mut self) -> FailoverResult<ConnectionState> {
        let (fallback, options) = {
            let config = self.config.borrow();
            (
                config.links.fallback.as_ref().map(|_| ConnectionType::Fallback),
                WorkflowOptions::from(&config.workflow),
            )
        };

        if options != self.workflow.options() {
            tracing::info!(?options, "Workflow options updated");
            self.workflow.set_options(options);
        }

        self.workflow
            .handler(ConnectionType::Primary, ConnectionType::Backup, fallback)
            .await
    }

    /// Loop until shutdown, then hand the engine back.
    pub async fn run(mut self, mut shutdown: ShutdownReceiver) -> Workflow<M> {
        tracing::info!(state = %self.workflow.current(), "Link monitor starting");

        loop {
            let active = match self.run_cycle().await {
                Ok(active) => active,
                Err(e) => {
                    metrics::record_cycle_error();
                    tracing::error!(error = %e, "Failover cycle failed");
                    self.workflow.current()
                }
            };

            let delay = next_interval(active, &self.config.borrow().intervals);
            tracing::debug!(active = %active, delay_secs = delay.as_secs(), "Next cycle scheduled");

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                reason = shutdown.recv() => {
                    let reason = reason.unwrap_or("channel closed");
                    tracing::info!(reason, "Link monitor stopping");
                    break;
                }
            }
        }

        self.workflow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_interval_by_state() {
        let intervals = IntervalConfig {
            primary_active_secs: 30,
            standby_active_secs: 5,
        };
        assert_eq!(next_interval(ConnectionState::Primary, &intervals), Duration::from_secs(30));
        assert_eq!(next_interval(ConnectionState::Backup, &intervals), Duration::from_secs(5));
        assert_eq!(next_interval(ConnectionState::Fallback, &intervals), Duration::from_secs(5));
        assert_eq!(next_interval(ConnectionState::None, &intervals), Duration::from_secs(5));
    }
}
