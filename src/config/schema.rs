//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the controller.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the failover controller.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct FailoverConfig {
    /// Interface names per role.
    pub links: LinksConfig,

    /// Cycle intervals.
    pub intervals: IntervalConfig,

    /// Connectivity probe settings.
    pub probe: ProbeConfig,

    /// Retry configuration for probes.
    pub retries: RetryConfig,

    /// Route metric translation.
    pub routing: RoutingConfig,

    /// Decision engine options.
    pub workflow: WorkflowConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Interface names managed by the controller.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct LinksConfig {
    /// Preferred link (e.g., "eth0").
    pub primary: String,

    /// First standby link.
    pub backup: String,

    /// Optional second standby link.
    pub fallback: Option<String>,
}

/// How often a cycle runs, depending on which role is active.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct IntervalConfig {
    /// Interval while the primary link carries traffic, in seconds.
    pub primary_active_secs: u64,

    /// Interval while a standby link (or nothing) carries traffic, in seconds.
    pub standby_active_secs: u64,
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            primary_active_secs: 30,
            standby_active_secs: 5,
        }
    }
}

/// Connectivity probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ProbeConfig {
    /// Targets probed through each interface; one is picked at random per attempt.
    pub monitoring_urls: Vec<String>,

    /// curl `--connect-timeout`, in seconds.
    pub connect_timeout_secs: u64,

    /// curl `--max-time`, in seconds.
    pub max_time_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            monitoring_urls: DEFAULT_MONITORING_URLS.iter().map(|u| u.to_string()).collect(),
            connect_timeout_secs: 1,
            max_time_secs: 1,
        }
    }
}

pub const DEFAULT_MONITORING_URLS: &[&str] = &[
    "https://1.1.1.1",
    "https://baidu.com",
    "https://bing.com",
    "https://duckduckgo.com",
    "https://example.com",
    "https://facebook.com",
    "https://google.com",
    "https://instagram.com",
    "https://apple.com",
    "https://pinterest.com",
    "https://reddit.com",
    "https://t.me",
    "https://temu.com",
    "https://tiktok.com",
    "https://whatsapp.com",
    "https://wikipedia.org",
    "https://yahoo.com",
    "https://youtube.com",
    "https://zoom.us",
    "https://x.com",
    "https://aliexpress.com",
    "https://yandex.ru",
    "https://ebay.com",
    "https://live.com",
    "https://twitch.tv",
    "https://netflix.com",
    "https://linkedin.com",
];

/// Backoff shape between probe attempts.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    #[default]
    Constant,
    Exponential,
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts per probe (first attempt included).
    pub max_attempts: u32,

    /// Backoff shape.
    pub backoff: BackoffKind,

    /// Constant delay, or base delay for exponential backoff, in milliseconds.
    pub base_delay_ms: u64,

    /// Cap for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: BackoffKind::Constant,
            base_delay_ms: 50,
            max_delay_ms: 1000,
        }
    }
}

/// Rank to route-metric translation.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RoutingConfig {
    /// Metric = (rank + 1) * metric_step. Lower metric wins.
    pub metric_step: u32,

    /// Pause after `nmcli device reapply`, in milliseconds.
    pub reapply_settle_ms: u64,

    /// Deadline for each nmcli invocation, in seconds.
    pub command_timeout_secs: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            metric_step: 100,
            reapply_settle_ms: 250,
            command_timeout_secs: 10,
        }
    }
}

/// Decision engine options.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Drop the active state back to NONE when every link is down.
    pub revert_to_none_on_total_outage: bool,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9464".to_string(),
        }
    }
}
