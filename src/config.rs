//! Configuration Module
//!
//! Handles loading the workload driver configuration from environment variables.

use std::env;
use std::num::NonZeroUsize;

const DEFAULT_MAX_SIZE: usize = 32;
const DEFAULT_WORKLOAD_OPS: usize = 10_000;
const DEFAULT_WORKLOAD_TTL: i64 = 1;

/// Driver configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_size: NonZeroUsize,
    /// Number of operations the workload performs
    pub workload_ops: usize,
    /// TTL in seconds used by the workload's expiring writes
    pub workload_ttl: i64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_SIZE` - Maximum cache entries (default: 32, zero is ignored)
    /// - `WORKLOAD_OPS` - Operations performed by the driver (default: 10000)
    /// - `WORKLOAD_TTL` - TTL in seconds for expiring writes (default: 1)
    pub fn from_env() -> Self {
        Self {
            max_size: env::var("MAX_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .and_then(NonZeroUsize::new)
                .unwrap_or(default_max_size()),
            workload_ops: env::var("WORKLOAD_OPS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_WORKLOAD_OPS),
            workload_ttl: env::var("WORKLOAD_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_WORKLOAD_TTL),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_size: default_max_size(),
            workload_ops: DEFAULT_WORKLOAD_OPS,
            workload_ttl: DEFAULT_WORKLOAD_TTL,
        }
    }
}

fn default_max_size() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_MAX_SIZE).unwrap_or(NonZeroUsize::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_size.get(), 32);
        assert_eq!(config.workload_ops, 10_000);
        assert_eq!(config.workload_ttl, 1);
    }

    // Single test so the env var mutations do not race with each other.
    #[test]
    fn test_config_from_env() {
        env::remove_var("MAX_SIZE");
        env::remove_var("WORKLOAD_OPS");
        env::remove_var("WORKLOAD_TTL");

        let config = Config::from_env();
        assert_eq!(config.max_size.get(), 32);
        assert_eq!(config.workload_ops, 10_000);
        assert_eq!(config.workload_ttl, 1);

        env::set_var("MAX_SIZE", "0");
        env::set_var("WORKLOAD_OPS", "not-a-number");
        env::set_var("WORKLOAD_TTL", "-3");

        let config = Config::from_env();
        assert_eq!(config.max_size.get(), 32);
        assert_eq!(config.workload_ops, 10_000);
        assert_eq!(config.workload_ttl, -3);

        env::set_var("MAX_SIZE", "1024");
        assert_eq!(Config::from_env().max_size.get(), 1024);

        env::remove_var("MAX_SIZE");
        env::remove_var("WORKLOAD_OPS");
        env::remove_var("WORKLOAD_TTL");
    }
}
