//! # Configuration
//!
//! Connection settings for [`PgGateway`](crate::store::PgGateway), read from the environment.
//!
//! | Variable | Required | Default |
//! |---|---|---|
//! | `DB_USER` | yes | |
//! | `DB_PASSWORD` | yes | |
//! | `DB_HOST` | yes | |
//! | `DB_NAME` | yes | |
//! | `DB_PORT` | no | `5432` |
//! | `DB_POOL_MAX` | no | `20` |
//! | `DB_IDLE_TIMEOUT_MS` | no | `30000` |
//! | `DB_CONNECT_TIMEOUT_MS` | no | `2000` |
//!
//! `DB_CONNECT_TIMEOUT_MS` bounds how long a statement waits for a pooled connection.

use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_POOL_MAX: u32 = 20;
pub const DEFAULT_IDLE_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 2_000;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Store connection and pool settings.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub database: String,
    pub port: u16,
    pub max_connections: u32,
    pub idle_timeout: Duration,
    pub connect_timeout: Duration,
}

// Keeps the password out of logs.
impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("user", &self.user)
            .field("host", &self.host)
            .field("database", &self.database)
            .field("port", &self.port)
            .field("max_connections", &self.max_connections)
            .field("idle_timeout", &self.idle_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish_non_exhaustive()
    }
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        Ok(Self {
            user: required("DB_USER")?,
            password: required("DB_PASSWORD")?,
            host: required("DB_HOST")?,
            database: required("DB_NAME")?,
            port: parse_or(get("DB_PORT"), "DB_PORT", DEFAULT_PORT)?,
            max_connections: parse_or(get("DB_POOL_MAX"), "DB_POOL_MAX", DEFAULT_POOL_MAX)?,
            idle_timeout: Duration::from_millis(parse_or(
                get("DB_IDLE_TIMEOUT_MS"),
                "DB_IDLE_TIMEOUT_MS",
                DEFAULT_IDLE_TIMEOUT_MS,
            )?),
            connect_timeout: Duration::from_millis(parse_or(
                get("DB_CONNECT_TIMEOUT_MS"),
                "DB_CONNECT_TIMEOUT_MS",
                DEFAULT_CONNECT_TIMEOUT_MS,
            )?),
        })
    }
}

fn parse_or<T: FromStr>(value: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => match raw.trim().parse() {
            Ok(value) => Ok(value),
            Err(_) => Err(ConfigError::Invalid { key, value: raw }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("DB_USER", "inventory"),
        ("DB_PASSWORD", "secret"),
        ("DB_HOST", "localhost"),
        ("DB_NAME", "stocks"),
    ];

    #[test]
    fn defaults_apply_when_optional_values_are_absent() {
        let config = StoreConfig::from_lookup(lookup(REQUIRED)).unwrap();
        assert_eq!(config.port, 5432);
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.idle_timeout, Duration::from_millis(30_000));
        assert_eq!(config.connect_timeout, Duration::from_millis(2_000));
    }

    #[test]
    fn missing_required_value() {
        let err = StoreConfig::from_lookup(lookup(&REQUIRED[1..])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DB_USER"));
    }

    #[test]
    fn invalid_port() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("DB_PORT", "postgres"));
        let err = StoreConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "DB_PORT",
                value: "postgres".to_string()
            }
        );
    }

    #[test]
    fn debug_output_hides_password() {
        let config = StoreConfig::from_lookup(lookup(REQUIRED)).unwrap();
        assert!(!format!("{config:?}").contains("secret"));
    }
}
