use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::warn;

pub const CAPACITY_VAR: &str = "BP_POOL_CAPACITY";
pub const ACQUIRE_TIMEOUT_VAR: &str = "BP_POOL_ACQUIRE_TIMEOUT_MS";

/// Pool settings, read from a config file section or the environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Number of resources created when the pool is built.
    pub capacity: usize,
    /// Timeout used by [`Pool::acquire_default`](crate::Pool::acquire_default).
    pub acquire_timeout_ms: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: Self::DEFAULT_CAPACITY,
            acquire_timeout_ms: Self::DEFAULT_ACQUIRE_TIMEOUT_MS,
        }
    }
}

impl PoolConfig {
    pub const DEFAULT_CAPACITY: usize = 10;
    pub const DEFAULT_ACQUIRE_TIMEOUT_MS: u64 = 5_000;

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from `lookup`, falling back to the defaults for
    /// missing or unusable values.
    pub fn from_lookup<L>(lookup: L) -> Self
    where
        L: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(CAPACITY_VAR) {
            match raw.trim().parse::<usize>() {
                Ok(capacity) if capacity > 0 => config.capacity = capacity,
                _ => warn!(value = %raw, "ignoring invalid {}", CAPACITY_VAR),
            }
        }
        if let Some(raw) = lookup(ACQUIRE_TIMEOUT_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.acquire_timeout_ms = ms,
                Err(_) => warn!(value = %raw, "ignoring invalid {}", ACQUIRE_TIMEOUT_VAR),
            }
        }
        config
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }
}
