//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;

use tracing::warn;

use crate::cache::{
    EvictionPolicy, DEFAULT_CHECK_PERIOD_SECS, DEFAULT_MAX_KEYS, DEFAULT_TTL_SECS,
};

/// TTL in seconds handlers use for projects, listings and note pages
pub const DEFAULT_RESOURCE_TTL_SECS: i64 = 300;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8000;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Cache TTL in seconds for entries set without one; `<= 0` disables expiry
    pub default_ttl: i64,
    /// Background sweep interval in seconds
    pub check_period: u64,
    /// Maximum number of cache entries
    pub max_keys: usize,
    /// What the cache does with a new key when full
    pub eviction_policy: EvictionPolicy,
    /// TTL in seconds for entries written by the HTTP handlers
    pub resource_ttl: i64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PORT` - HTTP server port (default: 8000)
    /// - `CACHE_DEFAULT_TTL` - Default cache TTL in seconds (default: 900)
    /// - `CACHE_CHECK_PERIOD` - Sweep interval in seconds (default: 120)
    /// - `CACHE_MAX_KEYS` - Maximum cache entries (default: 10000)
    /// - `CACHE_EVICTION_POLICY` - `evict-oldest` or `reject-new` (default: evict-oldest)
    /// - `RESOURCE_CACHE_TTL` - TTL for cached projects and listings (default: 300)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from any variable source. Unparseable values fall back
    /// to their defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_or(&lookup, "PORT", defaults.server_port),
            default_ttl: parse_or(&lookup, "CACHE_DEFAULT_TTL", defaults.default_ttl),
            check_period: parse_or(&lookup, "CACHE_CHECK_PERIOD", defaults.check_period),
            max_keys: parse_or(&lookup, "CACHE_MAX_KEYS", defaults.max_keys),
            eviction_policy: parse_or(
                &lookup,
                "CACHE_EVICTION_POLICY",
                defaults.eviction_policy,
            ),
            resource_ttl: parse_or(&lookup, "RESOURCE_CACHE_TTL", defaults.resource_ttl),
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T {
    match lookup(name) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(variable = name, value = %raw, "invalid configuration value, using default");
            default
        }),
        None => default,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_PORT,
            default_ttl: DEFAULT_TTL_SECS,
            check_period: DEFAULT_CHECK_PERIOD_SECS,
            max_keys: DEFAULT_MAX_KEYS,
            eviction_policy: EvictionPolicy::EvictOldest,
            resource_ttl: DEFAULT_RESOURCE_TTL_SECS,
        }
    }
}
