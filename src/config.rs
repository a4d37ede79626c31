//! Runtime configuration read from the environment.

use crate::web::WebConfig;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use thiserror::Error;

/// Listen address used when `TASKBOARD_BIND` is unset.
pub const DEFAULT_BIND: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8000);
/// Connection pool size used when `TASKBOARD_DB_POOL_SIZE` is unset.
pub const DEFAULT_POOL_SIZE: u32 = 8;

/// Errors raised for malformed configuration values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid value {value:?} for {key}: {reason}")]
pub struct ConfigError {
    /// Environment variable name.
    pub key: &'static str,
    /// Rejected raw value.
    pub value: String,
    /// Why the value was rejected.
    pub reason: String,
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// `PostgreSQL` URL; `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub db_pool_size: u32,
    /// HTTP-layer settings.
    pub web: WebConfig,
}

impl AppConfig {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is present but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = WebConfig::default();

        let bind_addr = parse_or("TASKBOARD_BIND", read("TASKBOARD_BIND"), DEFAULT_BIND)?;
        let db_pool_size = parse_or(
            "TASKBOARD_DB_POOL_SIZE",
            read("TASKBOARD_DB_POOL_SIZE"),
            DEFAULT_POOL_SIZE,
        )?;
        if db_pool_size == 0 {
            return Err(ConfigError {
                key: "TASKBOARD_DB_POOL_SIZE",
                value: db_pool_size.to_string(),
                reason: "pool size must be at least 1".to_owned(),
            });
        }
        let csrf_protection = match read("TASKBOARD_CSRF") {
            Some(raw) => parse_flag("TASKBOARD_CSRF", &raw)?,
            None => defaults.csrf_protection,
        };
        let max_form_bytes = parse_or(
            "TASKBOARD_MAX_FORM_BYTES",
            read("TASKBOARD_MAX_FORM_BYTES"),
            defaults.max_form_bytes,
        )?;

        Ok(Self {
            bind_addr,
            database_url: read("DATABASE_URL"),
            db_pool_size,
            web: WebConfig {
                csrf_protection,
                max_form_bytes,
            },
        })
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.trim().parse().map_err(|err: T::Err| ConfigError {
            key,
            reason: err.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError {
            key,
            value: raw.to_owned(),
            reason: "expected true or false".to_owned(),
        }),
    }
}
