//! Configuration Module
//!
//! Handles loading and managing pipeline configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::DEFAULT_CAPACITY;
use crate::error::{EtlError, Result};
use crate::store::{DEFAULT_REAP_INTERVAL_MS, DEFAULT_TTL_SECS};

/// URLs processed by the demo run when `ETL_URLS` is not set.
pub const DEFAULT_URLS: [&str; 4] = [
    "https://example.com",
    "https://www.python.org",
    "https://www.wikipedia.org",
    "https://example.com",
];

/// Pipeline configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of results the recency cache can hold
    pub cache_capacity: usize,
    /// TTL in seconds applied to every result written to the store
    pub store_ttl: i64,
    /// Background reaper interval in milliseconds
    pub reap_interval_ms: u64,
    /// Per-request fetch timeout in seconds
    pub fetch_timeout: u64,
    /// URLs processed by a run, in order
    pub urls: Vec<String>,
    /// Lower bound of the pause between two work-units, in milliseconds
    pub pause_min_ms: u64,
    /// Upper bound of the pause between two work-units, in milliseconds
    pub pause_max_ms: u64,
    /// Number of store entries printed by the end-of-run dump
    pub dump_limit: usize,
    /// Number of words shown per dumped entry
    pub dump_words: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Recency cache capacity (default: 5)
    /// - `STORE_TTL` - Store TTL in seconds (default: 60)
    /// - `REAP_INTERVAL_MS` - Reaper frequency in milliseconds (default: 1000)
    /// - `FETCH_TIMEOUT` - Fetch timeout in seconds (default: 5)
    /// - `ETL_URLS` - Comma separated URL list (default: [`DEFAULT_URLS`])
    /// - `PAUSE_MIN_MS` / `PAUSE_MAX_MS` - Pause between URLs (default: 500 / 1500)
    /// - `DUMP_LIMIT` - Store entries printed at the end (default: 3)
    /// - `DUMP_WORDS` - Words printed per entry (default: 5)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_capacity: env_or("CACHE_CAPACITY", defaults.cache_capacity),
            store_ttl: env_or("STORE_TTL", defaults.store_ttl),
            reap_interval_ms: env_or("REAP_INTERVAL_MS", defaults.reap_interval_ms),
            fetch_timeout: env_or("FETCH_TIMEOUT", defaults.fetch_timeout),
            urls: env::var("ETL_URLS")
                .ok()
                .map(|v| parse_url_list(&v))
                .filter(|urls| !urls.is_empty())
                .unwrap_or(defaults.urls),
            pause_min_ms: env_or("PAUSE_MIN_MS", defaults.pause_min_ms),
            pause_max_ms: env_or("PAUSE_MAX_MS", defaults.pause_max_ms),
            dump_limit: env_or("DUMP_LIMIT", defaults.dump_limit),
            dump_words: env_or("DUMP_WORDS", defaults.dump_words),
        }
    }

    /// Rejects values the pipeline cannot be built with.
    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(EtlError::Configuration(
                "cache capacity must be positive".to_string(),
            ));
        }
        if self.reap_interval_ms == 0 {
            return Err(EtlError::Configuration(
                "reap interval must be positive".to_string(),
            ));
        }
        if self.fetch_timeout == 0 {
            return Err(EtlError::Configuration(
                "fetch timeout must be positive".to_string(),
            ));
        }
        if self.pause_min_ms > self.pause_max_ms {
            return Err(EtlError::Configuration(format!(
                "pause range is empty: {}ms > {}ms",
                self.pause_min_ms, self.pause_max_ms
            )));
        }
        Ok(())
    }

    /// Store TTL, saturated to the representable range.
    pub fn store_ttl(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::try_seconds(self.store_ttl).unwrap_or(if self.store_ttl < 0 {
            chrono::TimeDelta::MIN
        } else {
            chrono::TimeDelta::MAX
        })
    }

    pub fn reap_interval(&self) -> Duration {
        Duration::from_millis(self.reap_interval_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CAPACITY,
            store_ttl: DEFAULT_TTL_SECS,
            reap_interval_ms: DEFAULT_REAP_INTERVAL_MS,
            fetch_timeout: 5,
            urls: DEFAULT_URLS.iter().map(|u| u.to_string()).collect(),
            pause_min_ms: 500,
            pause_max_ms: 1500,
            dump_limit: 3,
            dump_words: 5,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_url_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .collect()
}
