//! Link failover controller.
//!
//! Probes a primary link and one or two standby links on this host and
//! reorders their route metrics so traffic always leaves through the
//! healthiest one.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                     LINK FAILOVER                            │
//!   │                                                              │
//!   │  ┌──────────┐    ┌────────────┐    ┌──────────────────────┐  │
//!   │  │ health   │───▶│ workflow   │───▶│ connection (nmcli)   │──┼──▶ curl / nmcli
//!   │  │ monitor  │    │ engine     │◀───│ probe + set_priority │  │
//!   │  └──────────┘    └────────────┘    └──────────────────────┘  │
//!   │                                                              │
//!   │  config (TOML + env, hot reload)   resilience (retry/backoff)│
//!   │  observability (tracing, metrics)  lifecycle (signals)       │
//!   └──────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::json;

use link_failover::config::{loader, ConfigError, FailoverConfig};
use link_failover::connection::{ConnectionManager, ConnectionType, NmcliConnectionManager};
use link_failover::lifecycle::startup;
use link_failover::observability::logging;

#[derive(Parser)]
#[command(name = "link-failover")]
#[command(about = "Keeps traffic on the healthiest network link of this host", long_about = None)]
struct Cli {
    /// TOML configuration file. Without it, links come from PRIMARY_CONNECTION,
    /// BACKUP_CONNECTION and FALLBACK_CONNECTION.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the controller (default)
    Run,
    /// Probe every configured link once and print the results
    Probe,
    /// Validate the configuration and exit
    Validate,
}

fn load(path: Option<&PathBuf>) -> Result<FailoverConfig, ConfigError> {
    match path {
        Some(path) => loader::load_config(path),
        None => loader::load_from_env(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load(cli.config.as_ref())?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            logging::init(&config.observability)?;
            tracing::info!("link-failover v{} starting", env!("CARGO_PKG_VERSION"));
            startup::run(config, cli.config).await?;
        }
        Commands::Probe => {
            logging::init(&config.observability)?;
            probe(&config).await?;
        }
        Commands::Validate => {
            println!(
                "Configuration OK: primary={} backup={} fallback={}",
                config.links.primary,
                config.links.backup,
                config.links.fallback.as_deref().unwrap_or("-")
            );
        }
    }

    Ok(())
}

async fn probe(config: &FailoverConfig) -> Result<(), Box<dyn std::error::Error>> {
    let manager = NmcliConnectionManager::new(config);

    let mut roles = vec![
        (ConnectionType::Primary, config.links.primary.as_str()),
        (ConnectionType::Backup, config.links.backup.as_str()),
    ];
    if let Some(fallback) = config.links.fallback.as_deref() {
        roles.push((ConnectionType::Fallback, fallback));
    }

    let checks = futures_util::future::join_all(
        roles.iter().map(|(role, _)| manager.is_connection_healthy(*role)),
    )
    .await;

    let mut report = Vec::with_capacity(roles.len());
    for ((_, interface), check) in roles.iter().zip(checks) {
        let check = check?;
        report.push(json!({
            "connection": check.connection_type,
            "interface": interface,
            "healthy": check.healthy,
            "check_resolved_in_ms": duration_ms(check.check_resolved_in),
        }));
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
