//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::FailoverConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variables that override the link names from the file.
pub const PRIMARY_CONNECTION_ENV: &str = "PRIMARY_CONNECTION";
pub const BACKUP_CONNECTION_ENV: &str = "BACKUP_CONNECTION";
pub const FALLBACK_CONNECTION_ENV: &str = "FALLBACK_CONNECTION";

/// Environment variables that override the cycle intervals, in seconds.
pub const PRIMARY_CHECK_INTERVAL_ENV: &str = "PRIMARY_CHECK_INTERVAL_IN_SECONDS";
pub const BACKUP_CHECK_INTERVAL_ENV: &str = "BACKUP_CHECK_INTERVAL_IN_SECONDS";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file, honouring environment overrides.
pub fn load_config(path: &Path) -> Result<FailoverConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content, |key| std::env::var(key).ok())
}

/// Build a configuration from environment variables only.
pub fn load_from_env() -> Result<FailoverConfig, ConfigError> {
    parse_config("", |key| std::env::var(key).ok())
}

/// Parse TOML, apply overrides from `lookup`, then validate.
pub fn parse_config<F>(content: &str, lookup: F) -> Result<FailoverConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config: FailoverConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
    let mut errors = apply_env_overrides(&mut config, lookup);

    if let Err(mut invalid) = validate_config(&config) {
        errors.append(&mut invalid);
    }
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }

    Ok(config)
}

/// Apply overrides; returns the variables whose value could not be used.
fn apply_env_overrides<F>(config: &mut FailoverConfig, lookup: F) -> Vec<ValidationError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut errors = Vec::new();

    if let Some(primary) = lookup(PRIMARY_CONNECTION_ENV) {
        config.links.primary = primary;
    }
    if let Some(backup) = lookup(BACKUP_CONNECTION_ENV) {
        config.links.backup = backup;
    }
    if let Some(fallback) = lookup(FALLBACK_CONNECTION_ENV) {
        // empty value disables the fallback slot
        config.links.fallback = Some(fallback).filter(|f| !f.is_empty());
    }

    let intervals = [
        (PRIMARY_CHECK_INTERVAL_ENV, &mut config.intervals.primary_active_secs),
        (BACKUP_CHECK_INTERVAL_ENV, &mut config.intervals.standby_active_secs),
    ];
    for (key, slot) in intervals {
        let Some(raw) = lookup(key) else { continue };
        match raw.trim().parse::<u64>() {
            Ok(secs) => *slot = secs,
            Err(_) => errors.push(ValidationError::new(
                key,
                format!("expected a whole number of seconds, got {:?}", raw),
            )),
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{BackoffKind, LogFormat};
    use std::collections::HashMap;

    const SAMPLE: &str = r#"
        [links]
        primary = "eth0"
        backup = "wlan0"

        [intervals]
        standby_active_secs = 2

        [retries]
        backoff = "exponential"

        [observability]
        log_format = "json"
    "#;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_parse_with_defaults() {
        let config = parse_config(SAMPLE, no_env).unwrap();
        assert_eq!(config.links.primary, "eth0");
        assert_eq!(config.links.fallback, None);
        assert_eq!(config.intervals.standby_active_secs, 2);
        assert_eq!(config.intervals.primary_active_secs, 30);
        assert_eq!(config.retries.backoff, BackoffKind::Exponential);
        assert_eq!(config.retries.max_attempts, 3);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.routing.metric_step, 100);
    }

    #[test]
    fn test_env_overrides_links() {
        let env: HashMap<&str, &str> = [
            (PRIMARY_CONNECTION_ENV, "enp3s0"),
            (FALLBACK_CONNECTION_ENV, "wwan0"),
        ]
        .into_iter()
        .collect();

        let config = parse_config(SAMPLE, |key| env.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.links.primary, "enp3s0");
        assert_eq!(config.links.backup, "wlan0");
        assert_eq!(config.links.fallback.as_deref(), Some("wwan0"));
    }

    #[test]
    fn test_env_overrides_intervals() {
        let env: HashMap<&str, &str> = [
            (PRIMARY_CHECK_INTERVAL_ENV, "45"),
            (BACKUP_CHECK_INTERVAL_ENV, " 3 "),
        ]
        .into_iter()
        .collect();

        let config = parse_config(SAMPLE, |key| env.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.intervals.primary_active_secs, 45);
        assert_eq!(config.intervals.standby_active_secs, 3);
    }

    #[test]
    fn test_bad_interval_env_is_reported() {
        let err = parse_config(SAMPLE, |key| {
            (key == BACKUP_CHECK_INTERVAL_ENV).then(|| "often".to_string())
        })
        .unwrap_err();

        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, BACKUP_CHECK_INTERVAL_ENV);
            }
            other => panic!("expected validation error, got {}", other),
        }
    }

    #[test]
    fn test_zero_interval_env_fails_validation() {
        let err = parse_config(SAMPLE, |key| {
            (key == PRIMARY_CHECK_INTERVAL_ENV).then(|| "0".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("intervals.primary_active_secs"));
    }

    #[test]
    fn test_empty_fallback_env_disables_slot() {
        let content = SAMPLE.replace("backup = \"wlan0\"", "backup = \"wlan0\"\nfallback = \"usb0\"");
        let config = parse_config(&content, |key| {
            (key == FALLBACK_CONNECTION_ENV).then(String::new)
        })
        .unwrap();
        assert_eq!(config.links.fallback, None);
    }

    #[test]
    fn test_validation_error_is_reported() {
        let err = parse_config("[links]\nprimary = \"eth0\"\n", no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("links.backup"));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = parse_config("[links\nprimary = 3", no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
