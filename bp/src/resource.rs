use std::error::Error;

/// Creates and health-checks the resources held by a [`Pool`](crate::Pool).
///
/// Both methods may perform slow I/O; the pool never calls them while holding
/// its lock.
pub trait Factory: Send + Sync {
    type Output: Send;
    type Error: Error + Send + Sync + 'static;

    fn try_create(&self) -> Result<Self::Output, Self::Error>;

    fn is_healthy(&self, _resource: &Self::Output) -> bool {
        true
    }
}
