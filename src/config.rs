//! Service configuration loaded from environment variables.
//!
//! - `DATABASE_URL` - Postgres connection string. When unset the service runs
//!   against the in-memory gateway.
//! - `HOST` - bind address (default: 0.0.0.0)
//! - `PORT` - listen port (default: 8080)
//! - `TRACKING_DURATION_MS` - rider animation length (default: 8000)
//! - `TRACKING_TICK_MS` - rider animation step (default: 50)

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::domain::tracking::{Coordinate, DEFAULT_ANIMATION_DURATION, DEFAULT_TICK, ILIGAN_CENTER};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingConfig {
    /// Where every delivery starts.
    pub origin: Coordinate,
    pub duration: Duration,
    pub tick: Duration,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            origin: ILIGAN_CENTER,
            duration: DEFAULT_ANIMATION_DURATION,
            tick: DEFAULT_TICK,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub tracking: TrackingConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let duration_ms: u64 = parse_or(&lookup, "TRACKING_DURATION_MS", 8000)?;
        let tick_ms: u64 = parse_or(&lookup, "TRACKING_TICK_MS", 50)?;
        if tick_ms == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "TRACKING_TICK_MS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            tracking: TrackingConfig {
                duration: Duration::from_millis(duration_ms),
                tick: Duration::from_millis(tick_ms),
                ..TrackingConfig::default()
            },
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}
