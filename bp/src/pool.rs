use crate::config::PoolConfig;
use crate::error::{Error, Result};
use crate::lease::Lease;
use crate::resource::Factory;
use crate::sync::{Claim, Slot, Slots};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// A fixed-capacity pool of long-lived resources shared between threads.
///
/// All resources are created up front. [`Pool::acquire`] blocks the calling
/// thread until one is idle, and the returned [`Lease`] puts it back on drop.
pub struct Pool<F: Factory> {
    inner: Arc<Inner<F>>,
}

impl<F: Factory> Clone for Pool<F> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Advisory counters; may be stale as soon as they are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub capacity: usize,
    pub idle: usize,
    pub leased: usize,
}

impl<F: Factory> Pool<F> {
    /// Creates `capacity` resources eagerly. The first creation error is
    /// returned and every resource created so far is dropped.
    pub fn new(factory: F, capacity: usize) -> Result<Self> {
        Self::build(factory, capacity, PoolConfig::default().acquire_timeout())
    }

    pub fn with_config(factory: F, config: &PoolConfig) -> Result<Self> {
        Self::build(factory, config.capacity, config.acquire_timeout())
    }

    fn build(factory: F, capacity: usize, acquire_timeout: Duration) -> Result<Self> {
        let resources = (0..capacity)
            .map(|_| factory.try_create().map_err(Error::creation))
            .collect::<Result<VecDeque<_>>>()?;
        info!(capacity, "resource pool ready");
        Ok(Self {
            inner: Arc::new(Inner {
                factory,
                slots: Slots::new(capacity, resources),
                acquire_timeout,
            }),
        })
    }

    /// Blocks until a resource is available or `timeout` has elapsed.
    pub fn acquire(&self, timeout: Duration) -> Result<Lease<'_, F>> {
        self.inner.acquire(timeout)
    }

    /// [`Pool::acquire`] with the timeout the pool was configured with.
    pub fn acquire_default(&self) -> Result<Lease<'_, F>> {
        self.inner.acquire(self.inner.acquire_timeout)
    }

    /// Wakes every blocked [`Pool::acquire`] with [`Error::ShuttingDown`] and
    /// destroys the idle resources. Leased resources are destroyed as they
    /// come back. Calling it again does nothing.
    pub fn shutdown(&self) {
        if let Some(idle) = self.inner.slots.close() {
            info!(destroyed = idle.len(), "resource pool shut down");
            drop(idle);
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.slots.is_closed()
    }

    pub fn size(&self) -> usize {
        self.inner.slots.capacity()
    }

    pub fn available(&self) -> usize {
        self.inner.slots.idle()
    }

    pub fn status(&self) -> Status {
        let (idle, leased) = self.inner.slots.counts();
        Status {
            capacity: self.size(),
            idle,
            leased,
        }
    }

    pub fn factory(&self) -> &F {
        &self.inner.factory
    }
}

pub(crate) struct Inner<F: Factory> {
    factory: F,
    slots: Slots<F::Output>,
    acquire_timeout: Duration,
}

impl<F: Factory> Inner<F> {
    fn acquire(&self, timeout: Duration) -> Result<Lease<'_, F>> {
        let deadline = Instant::now().checked_add(timeout);
        let slot = self.slots.take(deadline)?;
        // the factory runs outside the lock and may panic
        let claim = Claim::new(&self.slots);
        let resource = match slot {
            Slot::Idle(resource) if self.factory.is_healthy(&resource) => resource,
            Slot::Idle(resource) => {
                debug!("replacing unhealthy resource");
                drop(resource);
                self.refill()?
            }
            Slot::Vacant => self.refill()?,
        };
        claim.keep();
        Ok(Lease::new(self, resource))
    }

    fn refill(&self) -> Result<F::Output> {
        self.factory.try_create().map_err(|err| {
            warn!(error = %err, "failed to create a replacement resource");
            Error::creation(err)
        })
    }

    pub(crate) fn release(&self, resource: F::Output) {
        let claim = Claim::new(&self.slots);
        if !self.factory.is_healthy(&resource) {
            debug!("destroying unhealthy resource on release");
            drop(resource);
            return;
        }
        claim.keep();
        if let Some(rejected) = self.slots.put(resource) {
            drop(rejected);
        }
    }

    pub(crate) fn forget(&self) {
        self.slots.vacate();
    }

    pub(crate) fn factory(&self) -> &F {
        &self.factory
    }
}
