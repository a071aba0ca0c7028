//! Configuration Module
//!
//! Loads cache configuration from environment variables or a JSON document.

use std::env;
use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;

const DEFAULT_EXPIRATION_SECS: u64 = 300;
const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 1;

/// Cache configuration parameters.
///
/// A zero duration disables the corresponding behavior: entries never
/// expire by default, or no background sweep is run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// TTL applied to entries stored without an explicit one
    pub default_expiration: Duration,
    /// Background cleanup task interval
    pub cleanup_interval: Duration,
}

/// On-disk/wire shape of the configuration, durations in seconds.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawConfig {
    expiration: u64,
    interval: u64,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            expiration: DEFAULT_EXPIRATION_SECS,
            interval: DEFAULT_CLEANUP_INTERVAL_SECS,
        }
    }
}

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        Self {
            default_expiration: Duration::from_secs(raw.expiration),
            cleanup_interval: Duration::from_secs(raw.interval),
        }
    }
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DEFAULT_EXPIRATION` - Default TTL in seconds (default: 300, 0 = never)
    /// - `CACHE_CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1, 0 = disabled)
    pub fn from_env() -> Self {
        Self {
            default_expiration: Duration::from_secs(
                env::var("CACHE_DEFAULT_EXPIRATION")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_EXPIRATION_SECS),
            ),
            cleanup_interval: Duration::from_secs(
                env::var("CACHE_CLEANUP_INTERVAL")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_CLEANUP_INTERVAL_SECS),
            ),
        }
    }

    /// Parses `{"expiration": <secs>, "interval": <secs>}`.
    ///
    /// Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(json)?;
        Ok(raw.into())
    }
}

impl Default for Config {
    fn default() -> Self {
        RawConfig::default().into()
    }
}
