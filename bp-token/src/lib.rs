//! Blocking Pool: Expiring Session Token Cache
//!
//! A [`TokenCache`] maps session tokens to an expiry instant and an admin
//! flag. It never schedules its own cleanup; run a [`Janitor`] next to it.
mod cache;
pub mod clock;
mod config;
pub mod janitor;
mod shared;

pub use cache::{TokenCache, TokenEntry, Validation, Verdict, DEFAULT_TTL_MINUTES};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{
    ConfigError, Environment, TokenCacheConfig, ENVIRONMENT_VAR, FAIL_OPEN_VAR,
    SWEEP_INTERVAL_VAR, TTL_VAR,
};
pub use janitor::{Janitor, Sweep};
pub use shared::SharedMap;
