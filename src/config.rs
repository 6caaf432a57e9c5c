//! Runtime configuration from environment variables
//!
//! Every variable is optional; defaults reproduce the one-minute window,
//! 60s freshness threshold and 120s retention sweep.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_WINDOW_MS: i64 = 60_000;
pub const DEFAULT_MAX_AGE_SECS: i64 = 60;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 120;
pub const DEFAULT_RETENTION_MS: i64 = 120_000;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Tuning for the statistics engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsConfig {
    /// Width of the query window in milliseconds
    pub window_ms: i64,

    /// Transactions older than this many whole seconds are discarded
    pub max_age_secs: i64,

    /// Period of the retention sweep (first run after one period)
    pub sweep_interval_secs: u64,

    /// Buckets older than `now - retention_ms` are evicted by each sweep
    pub retention_ms: i64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            window_ms: DEFAULT_WINDOW_MS,
            max_age_secs: DEFAULT_MAX_AGE_SECS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            retention_ms: DEFAULT_RETENTION_MS,
        }
    }
}

impl StatsConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `TXSTATS_WINDOW_MS` (default: 60000)
    /// - `TXSTATS_MAX_AGE_SECS` (default: 60)
    /// - `TXSTATS_SWEEP_INTERVAL_SECS` (default: 120)
    /// - `TXSTATS_RETENTION_MS` (default: 120000)
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            window_ms: parse_var("TXSTATS_WINDOW_MS", DEFAULT_WINDOW_MS)?,
            max_age_secs: parse_var("TXSTATS_MAX_AGE_SECS", DEFAULT_MAX_AGE_SECS)?,
            sweep_interval_secs: parse_var(
                "TXSTATS_SWEEP_INTERVAL_SECS",
                DEFAULT_SWEEP_INTERVAL_SECS,
            )?,
            retention_ms: parse_var("TXSTATS_RETENTION_MS", DEFAULT_RETENTION_MS)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_ms <= 0 {
            return Err(ConfigError::InvalidValue(
                "TXSTATS_WINDOW_MS must be positive".to_string(),
            ));
        }
        if self.max_age_secs < 0 {
            return Err(ConfigError::InvalidValue(
                "TXSTATS_MAX_AGE_SECS must not be negative".to_string(),
            ));
        }
        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "TXSTATS_SWEEP_INTERVAL_SECS must be positive".to_string(),
            ));
        }
        if self.retention_ms < self.window_ms {
            return Err(ConfigError::InvalidValue(format!(
                "TXSTATS_RETENTION_MS ({}) must cover the query window ({}ms)",
                self.retention_ms, self.window_ms
            )));
        }
        Ok(())
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Window width in whole seconds, as reported to clients
    pub fn window_secs(&self) -> i64 {
        self.window_ms / 1000
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

impl ServerConfig {
    /// Load from `TXSTATS_BIND_ADDR` (default: 127.0.0.1:8080)
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = env::var("TXSTATS_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw.parse().map_err(|_| {
            ConfigError::InvalidValue(format!("TXSTATS_BIND_ADDR '{}' is not a socket address", raw))
        })?;
        Ok(Self { bind_addr })
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            ConfigError::InvalidValue(format!("{} '{}' is not a valid number", name, raw))
        }),
        Err(_) => Ok(default),
    }
}
