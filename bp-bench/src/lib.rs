//! Shared fixtures for the pool and token cache benchmarks.
use bp::Factory;
use crossbeam_utils::thread;
use std::convert::Infallible;
use std::fmt::{self, Display, Formatter};
use std::time::Duration;

/// How long any pool under test may block a worker before the run is
/// considered broken.
pub const TIMEOUT: Duration = Duration::from_secs(30);

pub struct IntFactory;

impl Factory for IntFactory {
    type Output = i32;
    type Error = Infallible;

    fn try_create(&self) -> Result<Self::Output, Self::Error> {
        Ok(0)
    }

    fn is_healthy(&self, resource: &Self::Output) -> bool {
        resource >= &0
    }
}

#[derive(Debug, thiserror::Error)]
#[error("resource failed its health check")]
pub struct Unhealthy;

/// Pool capacity against the number of threads competing for it.
#[derive(Debug, Clone, Copy)]
pub struct Contention {
    pub capacity: usize,
    pub workers: usize,
}

impl Display for Contention {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "capacity={:02} workers={:02}", self.capacity, self.workers)
    }
}

/// Threads validating tokens against threads refreshing them.
#[derive(Debug, Clone, Copy)]
pub struct Mix {
    pub readers: usize,
    pub writers: usize,
}

impl Display for Mix {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "readers={:02} writers={:02}", self.readers, self.writers)
    }
}

/// Runs `work` once on each of `workers` scoped threads and waits for all.
pub fn contend<W>(workers: usize, work: W)
where
    W: Fn() + Sync,
{
    thread::scope(|s| {
        for _ in 0..workers {
            s.spawn(|_| work());
        }
    })
    .unwrap();
}

pub fn factorial(n: i64) -> i64 {
    (1..=n).product()
}

/// Stand-in for the work done while a resource is held.
pub fn loop_factorial20() {
    for _ in 0..1_000 {
        criterion::black_box(factorial(20));
    }
}
