//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when enabled
//! - Build the connection manager and the decision engine
//! - Start the config watcher and fan reloads out to adapter and monitor
//! - Run the monitor until a shutdown signal arrives
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The engine state is created here, once, and starts at NONE

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::watch;

use crate::config::schema::FailoverConfig;
use crate::config::watcher::ConfigWatcher;
use crate::connection::NmcliConnectionManager;
use crate::health::LinkMonitor;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;
use crate::workflow::{Workflow, WorkflowOptions};

/// Run the controller until SIGINT/SIGTERM.
pub async fn run(
    config: FailoverConfig,
    config_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let manager = Arc::new(NmcliConnectionManager::new(&config));
    let (config_tx, config_rx) = watch::channel(config.clone());

    // keep the watcher alive for the whole run
    let _watcher = match config_path {
        Some(path) => {
            let (watcher, mut updates) = ConfigWatcher::new(&path);
            let guard = watcher.run()?;
            let manager = manager.clone();
            tokio::spawn(async move {
                while let Some(new_config) = updates.recv().await {
                    manager.apply_config(&new_config);
                    if config_tx.send(new_config).is_err() {
                        break;
                    }
                }
            });
            Some(guard)
        }
        None => None,
    };

    tracing::info!(
        primary = %config.links.primary,
        backup = %config.links.backup,
        fallback = ?config.links.fallback,
        primary_active_secs = config.intervals.primary_active_secs,
        standby_active_secs = config.intervals.standby_active_secs,
        "Failover controller starting"
    );

    let workflow = Workflow::new(manager, WorkflowOptions::from(&config.workflow));
    let monitor = LinkMonitor::new(workflow, config_rx);
    let shutdown = Shutdown::new();

    let (workflow, _) = tokio::join!(monitor.run(shutdown.subscribe()), async {
        let reason = match signals::wait_for_shutdown().await {
            Ok(signal) => {
                tracing::info!(signal, "Shutdown signal received");
                signal
            }
            Err(e) => {
                tracing::error!(error = %e, "Signal handling failed, shutting down");
                "signal handler error"
            }
        };
        shutdown.trigger(reason);
    });

    tracing::info!(state = %workflow.current(), "Shutdown complete");
    Ok(())
}
