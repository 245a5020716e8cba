//! Metrics collection and exposition.
//!
//! # Metrics
//! - `failover_probe_total` (counter): probes by connection and outcome
//! - `failover_probe_duration_seconds` (histogram): probe latency, retries included
//! - `failover_transitions_total` (counter): active-role changes by from/to
//! - `failover_active_connection` (gauge): 1 for the active role, 0 for the others
//! - `failover_cycle_errors_total` (counter): cycles that ended in an error
//!
//! Recording is a no-op until `init_metrics` installs the exporter.

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::connection::{ConnectionHealthyResult, ConnectionState};

const STATES: [ConnectionState; 4] = [
    ConnectionState::None,
    ConnectionState::Primary,
    ConnectionState::Backup,
    ConnectionState::Fallback,
];

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_probe(result: &ConnectionHealthyResult) {
    let connection = result.connection_type.as_str();
    ::metrics::counter!(
        "failover_probe_total",
        "connection" => connection,
        "healthy" => if result.healthy { "true" } else { "false" }
    )
    .increment(1);
    ::metrics::histogram!("failover_probe_duration_seconds", "connection" => connection)
        .record(result.check_resolved_in.as_secs_f64());
}

pub fn record_transition(from: ConnectionState, to: ConnectionState) {
    ::metrics::counter!(
        "failover_transitions_total",
        "from" => from.as_str(),
        "to" => to.as_str()
    )
    .increment(1);
}

pub fn record_active_connection(active: ConnectionState) {
    for state in STATES {
        let value = if state == active { 1.0 } else { 0.0 };
        ::metrics::gauge!("failover_active_connection", "connection" => state.as_str()).set(value);
    }
}

pub fn record_cycle_error() {
    ::metrics::counter!("failover_cycle_errors_total").increment(1);
}
