//! NetworkManager-backed connection manager.
//!
//! # Responsibilities
//! - Map roles to interface names from configuration
//! - Probe reachability through a given interface (curl, retried)
//! - Translate ranks into `ipv4/ipv6.route-metric` and reapply the device
//!
//! # Design Decisions
//! - Exhausted probes report `healthy: false`; only unknown roles are errors
//! - Settings live behind `ArcSwap` so a config reload takes effect on the next call
//! - Every command has a deadline; curl gets its own `--max-time` plus slack

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use uuid::Uuid;

use crate::config::schema::{FailoverConfig, LinksConfig, ProbeConfig, RoutingConfig};
use crate::connection::command;
use crate::connection::{
    ConnectionHealthyResult, ConnectionManager, ConnectionPriority, ConnectionType,
};
use crate::error::{FailoverError, FailoverResult};
use crate::observability::logging::duration_ms;
use crate::resilience::{AttemptContext, RetryPolicy};

const PROBE_DEADLINE_SLACK: Duration = Duration::from_secs(2);

/// Snapshot of everything the adapter reads from configuration.
#[derive(Debug, Clone)]
pub struct ManagerSettings {
    pub links: LinksConfig,
    pub probe: ProbeConfig,
    pub retry: RetryPolicy,
    pub routing: RoutingConfig,
}

impl ManagerSettings {
    pub fn from_config(config: &FailoverConfig) -> Self {
        Self {
            links: config.links.clone(),
            probe: config.probe.clone(),
            retry: RetryPolicy::from_config(&config.retries),
            routing: config.routing.clone(),
        }
    }

    /// Interface configured for a role.
    pub fn interface_for(&self, connection_type: ConnectionType) -> FailoverResult<&str> {
        let name = match connection_type {
            ConnectionType::Primary => Some(self.links.primary.as_str()),
            ConnectionType::Backup => Some(self.links.backup.as_str()),
            ConnectionType::Fallback => self.links.fallback.as_deref(),
            ConnectionType::None => None,
        };
        name.filter(|n| !n.is_empty()).ok_or_else(|| {
            tracing::error!(%connection_type, "Connection type not found");
            FailoverError::UnknownConnectionLink { connection_type }
        })
    }

    fn command_deadline(&self) -> Duration {
        Duration::from_secs(self.routing.command_timeout_secs)
    }
}

/// Route metric for a rank. Lower metric is preferred by the kernel.
pub fn route_metric(priority: usize, metric_step: u32) -> u32 {
    let rank = u32::try_from(priority).unwrap_or(u32::MAX);
    rank.saturating_add(1).saturating_mul(metric_step)
}

/// Find the active profile UUID bound to `device` in `nmcli -t -f UUID,DEVICE` output.
pub fn parse_active_uuid(stdout: &str, device: &str) -> Option<Uuid> {
    stdout
        .lines()
        .filter_map(|line| line.trim().split_once(':'))
        .find(|(_, dev)| *dev == device)
        .and_then(|(uuid, _)| Uuid::parse_str(uuid).ok())
}

/// Connection manager driving NetworkManager through `nmcli`.
#[derive(Debug)]
pub struct NmcliConnectionManager {
    settings: ArcSwap<ManagerSettings>,
}

impl NmcliConnectionManager {
    pub fn new(config: &FailoverConfig) -> Self {
        Self {
            settings: ArcSwap::from_pointee(ManagerSettings::from_config(config)),
        }
    }

    /// Swap in settings from a reloaded configuration.
    pub fn apply_config(&self, config: &FailoverConfig) {
        self.settings.store(Arc::new(ManagerSettings::from_config(config)));
        tracing::info!(
            primary = %config.links.primary,
            backup = %config.links.backup,
            fallback = ?config.links.fallback,
            "Connection manager settings reloaded"
        );
    }

    pub fn settings(&self) -> Arc<ManagerSettings> {
        self.settings.load_full()
    }

    async fn check_connectivity(
        settings: &ManagerSettings,
        connection_type: ConnectionType,
        interface_name: &str,
        ctx: AttemptContext,
    ) -> FailoverResult<()> {
        let Some(monitoring_url) = fastrand::choice(settings.probe.monitoring_urls.iter()) else {
            return Err(FailoverError::ConnectivityCheckFailed {
                connection_type,
                attempt: ctx.attempt,
            });
        };
        tracing::debug!(
            attempt = ctx.attempt,
            %connection_type,
            interface = %interface_name,
            %monitoring_url,
            "Checking connectivity"
        );

        let max_time = settings.probe.max_time_secs.to_string();
        let connect_timeout = settings.probe.connect_timeout_secs.to_string();
        let args = [
            "--interface",
            interface_name,
            "-sI",
            "--max-time",
            max_time.as_str(),
            "--connect-timeout",
            connect_timeout.as_str(),
            monitoring_url.as_str(),
        ];
        let deadline = Duration::from_secs(settings.probe.max_time_secs) + PROBE_DEADLINE_SLACK;

        let out = command::output("curl", &args, deadline).await?;
        if out.success() {
            Ok(())
        } else {
            Err(FailoverError::ConnectivityCheckFailed {
                connection_type,
                attempt: ctx.attempt,
            })
        }
    }

    async fn active_uuid(settings: &ManagerSettings, interface_name: &str) -> FailoverResult<Uuid> {
        let out = command::run(
            "nmcli",
            &["-t", "-f", "UUID,DEVICE", "connection", "show", "--active"],
            settings.command_deadline(),
        )
        .await?;

        parse_active_uuid(&out.stdout, interface_name).ok_or_else(|| {
            tracing::error!(interface = %interface_name, "Failed to get UUID for connection");
            FailoverError::UnableToGetIfaceUuid {
                connection_name: interface_name.to_string(),
                stdout: out.stdout,
                stderr: out.stderr,
            }
        })
    }

    async fn reapply(
        settings: &ManagerSettings,
        connection_type: ConnectionType,
        interface_name: &str,
    ) -> FailoverResult<()> {
        let start = Instant::now();
        command::run(
            "nmcli",
            &["device", "reapply", interface_name],
            settings.command_deadline(),
        )
        .await?;

        tracing::info!(
            %connection_type,
            interface = %interface_name,
            took_ms = duration_ms(start.elapsed()),
            "Connection applied changes"
        );
        tokio::time::sleep(Duration::from_millis(settings.routing.reapply_settle_ms)).await;
        Ok(())
    }
}

impl ConnectionManager for NmcliConnectionManager {
    async fn is_connection_healthy(
        &self,
        connection_type: ConnectionType,
    ) -> FailoverResult<ConnectionHealthyResult> {
        let settings = self.settings.load_full();
        let interface_name = settings.interface_for(connection_type)?;

        let start = Instant::now();
        let check = settings
            .retry
            .execute(|ctx| Self::check_connectivity(&settings, connection_type, interface_name, ctx))
            .await;
        let elapsed = start.elapsed();

        if let Err(e) = &check {
            tracing::debug!(%connection_type, interface = %interface_name, error = %e, "Probe exhausted its retries");
        }

        Ok(ConnectionHealthyResult::new(connection_type, check.is_ok(), elapsed))
    }

    async fn set_priority(
        &self,
        ConnectionPriority {
            connection_type,
            priority,
        }: ConnectionPriority,
    ) -> FailoverResult<()> {
        let settings = self.settings.load_full();
        let interface_name = settings.interface_for(connection_type)?;
        let metric = route_metric(priority, settings.routing.metric_step).to_string();

        let uuid = Self::active_uuid(&settings, interface_name).await?.to_string();
        let deadline = settings.command_deadline();

        let v4_args = ["connection", "modify", uuid.as_str(), "ipv4.route-metric", metric.as_str()];
        let v6_args = ["connection", "modify", uuid.as_str(), "ipv6.route-metric", metric.as_str()];
        let (v4, v6) = tokio::join!(
            command::run("nmcli", &v4_args, deadline),
            command::run("nmcli", &v6_args, deadline),
        );
        v4?;
        v6?;

        Self::reapply(&settings, connection_type, interface_name).await?;

        tracing::info!(
            %connection_type,
            interface = %interface_name,
            priority,
            %metric,
            "Connection priority set"
        );
        Ok(())
    }
}
