//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Link names present and distinct
//! - Value ranges (intervals > 0, attempts >= 1, metric step > 0)
//! - Monitoring targets are http(s) URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FailoverConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use url::Url;

use crate::config::schema::FailoverConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub(crate) fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &FailoverConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let links = &config.links;
    if links.primary.trim().is_empty() {
        errors.push(ValidationError::new("links.primary", "must name an interface"));
    }
    if links.backup.trim().is_empty() {
        errors.push(ValidationError::new("links.backup", "must name an interface"));
    }
    if let Some(fallback) = &links.fallback {
        if fallback.trim().is_empty() {
            errors.push(ValidationError::new("links.fallback", "must name an interface when set"));
        }
        if fallback == &links.primary || fallback == &links.backup {
            errors.push(ValidationError::new(
                "links.fallback",
                format!("interface {} is already used by another role", fallback),
            ));
        }
    }
    if !links.primary.is_empty() && links.primary == links.backup {
        errors.push(ValidationError::new(
            "links.backup",
            format!("interface {} is already used by the primary role", links.backup),
        ));
    }

    if config.intervals.primary_active_secs == 0 {
        errors.push(ValidationError::new("intervals.primary_active_secs", "must be greater than 0"));
    }
    if config.intervals.standby_active_secs == 0 {
        errors.push(ValidationError::new("intervals.standby_active_secs", "must be greater than 0"));
    }

    if config.probe.monitoring_urls.is_empty() {
        errors.push(ValidationError::new("probe.monitoring_urls", "at least one target is required"));
    }
    for raw in &config.probe.monitoring_urls {
        match Url::parse(raw) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => errors.push(ValidationError::new(
                "probe.monitoring_urls",
                format!("{} uses unsupported scheme {}", raw, url.scheme()),
            )),
            Err(e) => errors.push(ValidationError::new(
                "probe.monitoring_urls",
                format!("{} is not a valid URL: {}", raw, e),
            )),
        }
    }
    if config.probe.max_time_secs == 0 {
        errors.push(ValidationError::new("probe.max_time_secs", "must be greater than 0"));
    }

    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::new("retries.max_attempts", "must be at least 1"));
    }
    if config.retries.max_delay_ms < config.retries.base_delay_ms {
        errors.push(ValidationError::new(
            "retries.max_delay_ms",
            "must not be lower than retries.base_delay_ms",
        ));
    }

    if config.routing.metric_step == 0 {
        errors.push(ValidationError::new("routing.metric_step", "must be greater than 0"));
    }
    if config.routing.command_timeout_secs == 0 {
        errors.push(ValidationError::new("routing.command_timeout_secs", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("{} is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
