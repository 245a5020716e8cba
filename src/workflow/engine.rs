//! The failover decision engine.
//!
//! # Responsibilities
//! - Probe every configured link concurrently, once per cycle
//! - Pick the next active role from the current state and the probe results
//! - Issue the new priority ranking as one concurrent batch
//! - Record the new active role only after the whole batch succeeded

use futures_util::future::join_all;

use crate::config::schema::WorkflowConfig;
use crate::connection::{
    ConnectionHealthyResult, ConnectionManager, ConnectionPriority, ConnectionState, ConnectionType,
};
use crate::error::FailoverResult;
use crate::observability::metrics;
use crate::observability::logging::duration_ms;
use crate::workflow::sort::sorted_connection_check;
use crate::workflow::state::WorkflowState;
use crate::workflow::strategy::{self, CycleChecks, KeepReason, Plan, SwitchReason};

/// Behaviour switches for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkflowOptions {
    /// Drop back to NONE when every link is down instead of keeping the stale role.
    pub revert_to_none_on_total_outage: bool,
}

impl From<&WorkflowConfig> for WorkflowOptions {
    fn from(config: &WorkflowConfig) -> Self {
        Self {
            revert_to_none_on_total_outage: config.revert_to_none_on_total_outage,
        }
    }
}

/// Decision engine. Owns the workflow state; one `handler` call per cycle.
#[derive(Debug)]
pub struct Workflow<M> {
    connection_manager: M,
    state: WorkflowState,
    options: WorkflowOptions,
}

impl<M: ConnectionManager> Workflow<M> {
    pub fn new(connection_manager: M, options: WorkflowOptions) -> Self {
        Self::with_state(connection_manager, WorkflowState::new(), options)
    }

    pub fn with_state(connection_manager: M, state: WorkflowState, options: WorkflowOptions) -> Self {
        Self {
            connection_manager,
            state,
            options,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn current(&self) -> ConnectionState {
        self.state.current()
    }

    pub fn options(&self) -> WorkflowOptions {
        self.options
    }

    pub fn set_options(&mut self, options: WorkflowOptions) {
        self.options = options;
    }

    pub fn connection_manager(&self) -> &M {
        &self.connection_manager
    }

    /// Run one cycle and return the active state afterwards.
    ///
    /// A failing priority command fails the cycle and leaves the state untouched;
    /// the next cycle starts over from fresh probes.
    pub async fn handler(
        &mut self,
        primary: ConnectionType,
        backup: ConnectionType,
        fallback: Option<ConnectionType>,
    ) -> FailoverResult<ConnectionState> {
        let checks = self.probe(primary, backup, fallback).await?;

        for check in checks.iter() {
            metrics::record_probe(check);
            let latency_ms = duration_ms(check.check_resolved_in);
            if check.healthy {
                tracing::info!(connection = %check.connection_type, latency_ms, "{} connection is up", check.connection_type);
            } else {
                tracing::warn!(connection = %check.connection_type, latency_ms, "{} connection is down", check.connection_type);
            }
        }

        let from = self.state.current();

        if checks.all_down() {
            tracing::info!(current = %from, "All connections are down. Nothing to do.");
            if self.options.revert_to_none_on_total_outage && from != ConnectionState::None {
                tracing::warn!(from = %from, "Reverting active connection to NONE");
                self.state.reset();
                metrics::record_transition(from, ConnectionState::None);
            }
            metrics::record_active_connection(self.state.current());
            return Ok(self.state.current());
        }

        match strategy::plan(from, &checks) {
            Plan::Keep(reason) => log_keep(reason),
            Plan::Switch { order, reason } => {
                if let Some(main) = self.set_connection_priority(&order).await? {
                    let to = ConnectionState::from(main);
                    log_switch(reason, from, to);
                    metrics::record_transition(from, to);
                }
            }
        }

        metrics::record_active_connection(self.state.current());
        Ok(self.state.current())
    }

    async fn probe(
        &self,
        primary: ConnectionType,
        backup: ConnectionType,
        fallback: Option<ConnectionType>,
    ) -> FailoverResult<CycleChecks> {
        let fallback_check = async {
            match fallback {
                Some(connection_type) => self
                    .connection_manager
                    .is_connection_healthy(connection_type)
                    .await
                    .map(Some),
                None => Ok(None),
            }
        };

        // all probes settle before any error is surfaced
        let (primary, backup, fallback) = tokio::join!(
            self.connection_manager.is_connection_healthy(primary),
            self.connection_manager.is_connection_healthy(backup),
            fallback_check,
        );

        Ok(CycleChecks {
            primary: primary?,
            backup: backup?,
            fallback: fallback?,
        })
    }

    /// Rank `order` (after the standby tie-break) and apply it.
    ///
    /// Returns the role that became the main connection, or `None` when no
    /// candidate is healthy and nothing was issued.
    async fn set_connection_priority(
        &mut self,
        order: &[Option<ConnectionHealthyResult>],
    ) -> FailoverResult<Option<ConnectionType>> {
        let ranked: Vec<ConnectionHealthyResult> =
            sorted_connection_check(order).into_iter().flatten().collect();

        let Some(main) = ranked.iter().find(|r| r.healthy).map(|r| r.connection_type) else {
            tracing::warn!("No healthy connections available");
            return Ok(None);
        };

        let commands = ranked.iter().enumerate().map(|(priority, result)| {
            self.connection_manager.set_priority(ConnectionPriority {
                connection_type: result.connection_type,
                priority,
            })
        });

        // every command runs to completion; the first failure in rank order wins
        join_all(commands)
            .await
            .into_iter()
            .collect::<FailoverResult<Vec<()>>>()?;

        self.state.set_main_connection(main);
        Ok(Some(main))
    }
}

fn log_switch(reason: SwitchReason, from: ConnectionState, to: ConnectionState) {
    match reason {
        SwitchReason::Initial => {
            tracing::info!(from = %from, to = %to, "Activating {} connection", to)
        }
        SwitchReason::PrimaryDown => {
            tracing::error!(from = %from, to = %to, "Primary connection is down - activating backup/fallback")
        }
        SwitchReason::PrimaryRestored => {
            tracing::info!(from = %from, to = %to, "Primary connection is back up - switching back to primary")
        }
        SwitchReason::BackupDown => {
            tracing::error!(from = %from, to = %to, "Backup connection is down - activating fallback")
        }
        SwitchReason::FallbackDown => {
            tracing::error!(from = %from, to = %to, "Fallback connection is down - activating backup")
        }
    }
}

fn log_keep(reason: KeepReason) {
    match reason {
        KeepReason::PrimaryHealthy => tracing::debug!("Primary connection is healthy, keeping it active"),
        KeepReason::StandbyStillActive(active) => tracing::info!(
            active = %active,
            "Primary connection is still down - {} is already active, keeping it up",
            active
        ),
        KeepReason::NoHealthyCandidate => tracing::warn!("No healthy connections available"),
    }
}
