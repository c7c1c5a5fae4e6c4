//! Configuration Module
//!
//! Handles loading and managing cache and inspection endpoint configuration
//! from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::TtlBounds;

/// Cache and inspection endpoint configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the inspection endpoint listens on
    pub inspect_addr: String,
    /// Number of store partitions (rounded up to a power of two by the store)
    pub shards: usize,
    /// Background sweep interval in seconds, 0 disables the sweep
    pub sweep_interval: u64,
    /// Per-request time bound for the inspection endpoint, in seconds
    pub http_timeout: u64,
    /// Grace period for graceful shutdown, in seconds
    pub shutdown_grace: u64,
    /// Upper bound for TTLs of positive responses
    pub positive_max_ttl: u32,
    /// Upper bound for TTLs of negative responses
    pub negative_max_ttl: u32,
    /// Lower bound for all TTLs derived from responses
    pub min_ttl: u32,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `INSPECT_ADDR` - Inspection endpoint address (default: 127.0.0.1:8053)
    /// - `CACHE_SHARDS` - Store partitions (default: 256)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `HTTP_TIMEOUT` - Request time bound in seconds (default: 5)
    /// - `SHUTDOWN_GRACE` - Shutdown grace period in seconds (default: 5)
    /// - `POSITIVE_MAX_TTL` - Positive TTL cap (default: 3600)
    /// - `NEGATIVE_MAX_TTL` - Negative TTL cap (default: 1800)
    /// - `MIN_TTL` - TTL floor (default: 0)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            inspect_addr: env::var("INSPECT_ADDR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.inspect_addr),
            shards: env_or("CACHE_SHARDS", defaults.shards),
            sweep_interval: env_or("SWEEP_INTERVAL", defaults.sweep_interval),
            http_timeout: env_or("HTTP_TIMEOUT", defaults.http_timeout),
            shutdown_grace: env_or("SHUTDOWN_GRACE", defaults.shutdown_grace),
            positive_max_ttl: env_or("POSITIVE_MAX_TTL", defaults.positive_max_ttl),
            negative_max_ttl: env_or("NEGATIVE_MAX_TTL", defaults.negative_max_ttl),
            min_ttl: env_or("MIN_TTL", defaults.min_ttl),
        }
    }

    /// TTL clamps applied when building items from DNS messages.
    pub fn ttl_bounds(&self) -> TtlBounds {
        TtlBounds {
            min_ttl: self.min_ttl,
            positive_max_ttl: self.positive_max_ttl,
            negative_max_ttl: self.negative_max_ttl,
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inspect_addr: "127.0.0.1:8053".to_string(),
            shards: 256,
            sweep_interval: 60,
            http_timeout: 5,
            shutdown_grace: 5,
            positive_max_ttl: 3600,
            negative_max_ttl: 1800,
            min_ttl: 0,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
