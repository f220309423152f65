//! Driver configuration
//!
//! Loads the settings needed to open a `MySqlDriver` from environment
//! variables. Model and collection configuration lives in `model::config`.

use std::env;

use thiserror::Error;

use crate::error::ModelError;

/// Default maximum pool size
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default acquire timeout in seconds
pub const DEFAULT_ACQUIRE_TIMEOUT: u64 = 30;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}")]
    MissingRequired { key: String },

    #[error("Invalid value for {field}: '{value}', expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Validation failed for {field}: {reason}")]
    ValidationFailed { field: String, reason: String },
}

impl From<ConfigError> for ModelError {
    fn from(err: ConfigError) -> Self {
        ModelError::Configuration(err.to_string())
    }
}

/// Settings for opening a MySQL driver handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout: u64,
}

impl DriverConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }

    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn acquire_timeout(mut self, seconds: u64) -> Self {
        self.acquire_timeout = seconds;
        self
    }

    /// Load configuration from `DATABASE_URL`, `DB_MAX_CONNECTIONS` and
    /// `DB_ACQUIRE_TIMEOUT`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or_else(|| ConfigError::MissingRequired {
            key: "DATABASE_URL".to_string(),
        })?;

        let max_connections = parse_or_default(
            &lookup,
            "DB_MAX_CONNECTIONS",
            DEFAULT_MAX_CONNECTIONS,
            "a positive integer",
        )?;
        let acquire_timeout = parse_or_default(
            &lookup,
            "DB_ACQUIRE_TIMEOUT",
            DEFAULT_ACQUIRE_TIMEOUT,
            "a number of seconds",
        )?;

        let config = Self {
            database_url,
            max_connections,
            acquire_timeout,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.database_url).map_err(|e| {
            ConfigError::ValidationFailed {
                field: "database_url".to_string(),
                reason: e.to_string(),
            }
        })?;

        if parsed.scheme() != "mysql" {
            return Err(ConfigError::InvalidValue {
                field: "database_url".to_string(),
                value: parsed.scheme().to_string(),
                expected: "a mysql:// URL".to_string(),
            });
        }

        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(ConfigError::ValidationFailed {
                field: "database_url".to_string(),
                reason: "Missing host in database URL".to_string(),
            });
        }

        if self.max_connections == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "max_connections".to_string(),
                reason: "Must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T, expected: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            field: key.to_string(),
            value: raw,
            expected: expected.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config =
            DriverConfig::from_lookup(lookup_from(&[("DATABASE_URL", "mysql://root@localhost/app")]))
                .unwrap();

        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.acquire_timeout, DEFAULT_ACQUIRE_TIMEOUT);
    }

    #[test]
    fn test_overrides_parsed() {
        let config = DriverConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mysql://root@db:3306/app"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("DB_ACQUIRE_TIMEOUT", " 5 "),
        ]))
        .unwrap();

        assert_eq!(config.max_connections, 12);
        assert_eq!(config.acquire_timeout, 5);
    }

    #[test]
    fn test_missing_url() {
        let err = DriverConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingRequired {
                key: "DATABASE_URL".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_other_schemes() {
        let err = DriverConfig::new("postgres://localhost/app").validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_rejects_bad_numbers() {
        let err = DriverConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mysql://localhost/app"),
            ("DB_MAX_CONNECTIONS", "many"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "DB_MAX_CONNECTIONS"));

        let err = DriverConfig::new("mysql://localhost/app")
            .max_connections(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationFailed { .. }));
    }
}
