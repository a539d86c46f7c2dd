use crate::pool::Inner;
use crate::resource::Factory;
use std::fmt::{self, Debug, Formatter};
use std::ops::{Deref, DerefMut};

/// Exclusive use of one pooled resource, returned to the pool on drop.
#[must_use = "dropping a lease returns the resource immediately"]
pub struct Lease<'a, F: Factory> {
    pool: &'a Inner<F>,
    resource: Option<F::Output>,
}

impl<'a, F: Factory> Lease<'a, F> {
    pub(crate) fn new(pool: &'a Inner<F>, resource: F::Output) -> Self {
        Self {
            pool,
            resource: Some(resource),
        }
    }

    pub fn resource(lease: &Self) -> &F::Output {
        lease
            .resource
            .as_ref()
            .expect("lease used after its resource was released")
    }

    pub fn resource_mut(lease: &mut Self) -> &mut F::Output {
        lease
            .resource
            .as_mut()
            .expect("lease used after its resource was released")
    }

    pub fn release(lease: Self) {
        drop(lease);
    }

    /// Takes the resource out of the pool for good. Its slot is refilled with
    /// a fresh resource by a later acquire.
    pub fn detach(mut lease: Self) -> F::Output {
        let resource = lease
            .resource
            .take()
            .expect("lease used after its resource was released");
        lease.pool.forget();
        resource
    }

    pub fn is_healthy(lease: &Self) -> bool {
        lease.pool.factory().is_healthy(Self::resource(lease))
    }
}

impl<F: Factory> Deref for Lease<'_, F> {
    type Target = F::Output;

    fn deref(&self) -> &Self::Target {
        Self::resource(self)
    }
}

impl<F: Factory> DerefMut for Lease<'_, F> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        Self::resource_mut(self)
    }
}

impl<F: Factory> Drop for Lease<'_, F> {
    fn drop(&mut self) {
        if let Some(resource) = self.resource.take() {
            self.pool.release(resource);
        }
    }
}

impl<F> Debug for Lease<'_, F>
where
    F: Factory,
    F::Output: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Lease").field(&self.resource).finish()
    }
}
