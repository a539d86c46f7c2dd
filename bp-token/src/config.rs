use crate::cache::{Validation, DEFAULT_TTL_MINUTES};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const ENVIRONMENT_VAR: &str = "BP_ENV";
pub const FAIL_OPEN_VAR: &str = "BP_TOKEN_FAIL_OPEN";
pub const TTL_VAR: &str = "BP_TOKEN_TTL_MINUTES";
pub const SWEEP_INTERVAL_VAR: &str = "BP_TOKEN_SWEEP_INTERVAL_MS";

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("fail-open token validation cannot be enabled in production")]
    FailOpenInProduction,

    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Development,
    Test,
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            _ => Err(()),
        }
    }
}

/// Token cache settings. The environment defaults to production.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenCacheConfig {
    pub environment: Environment,
    /// Report every token as valid while logging the real verdict.
    /// Rejected in production.
    pub fail_open: bool,
    pub default_ttl_minutes: i64,
    pub sweep_interval_ms: u64,
}

impl Default for TokenCacheConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Production,
            fail_open: false,
            default_ttl_minutes: DEFAULT_TTL_MINUTES,
            sweep_interval_ms: 60_000,
        }
    }
}

impl TokenCacheConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENVIRONMENT_VAR) {
            config.environment = raw.parse().map_err(|_| invalid(ENVIRONMENT_VAR, raw))?;
        }
        if let Some(raw) = lookup(FAIL_OPEN_VAR) {
            config.fail_open = match raw.trim() {
                "1" | "true" => true,
                "0" | "false" => false,
                _ => return Err(invalid(FAIL_OPEN_VAR, raw)),
            };
        }
        if let Some(raw) = lookup(TTL_VAR) {
            config.default_ttl_minutes = raw.trim().parse().map_err(|_| invalid(TTL_VAR, raw))?;
        }
        if let Some(raw) = lookup(SWEEP_INTERVAL_VAR) {
            config.sweep_interval_ms = match raw.trim().parse() {
                Ok(ms) if ms > 0 => ms,
                _ => return Err(invalid(SWEEP_INTERVAL_VAR, raw)),
            };
        }
        config.validation()?;
        Ok(config)
    }

    pub fn validation(&self) -> Result<Validation, ConfigError> {
        match (self.fail_open, self.environment) {
            (false, _) => Ok(Validation::Strict),
            (true, Environment::Production) => Err(ConfigError::FailOpenInProduction),
            (true, _) => Ok(Validation::FailOpen),
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

fn invalid(key: &'static str, value: String) -> ConfigError {
    ConfigError::Invalid { key, value }
}
