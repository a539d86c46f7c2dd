//! Blocking Pool: Bounded Thread-Blocking Resource Pool
mod config;
mod error;
mod lease;
mod pool;
pub mod resource;
mod sync;

pub use config::{PoolConfig, ACQUIRE_TIMEOUT_VAR, CAPACITY_VAR};
pub use error::{BoxDynError, Error, Result};
pub use lease::Lease;
pub use pool::{Pool, Status};
pub use resource::Factory;
