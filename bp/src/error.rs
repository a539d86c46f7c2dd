use std::error::Error as StdError;
use std::result::Result as StdResult;

pub type BoxDynError = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("attempted to acquire a resource on a shut down pool")]
    ShuttingDown,

    #[error("pool timed out while waiting for a resource")]
    Timeout,

    #[error("failed to create a resource")]
    ResourceCreation(#[source] BoxDynError),
}

impl Error {
    pub(crate) fn creation<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::ResourceCreation(Box::new(err))
    }

    /// Returns `true` for errors where the pool itself is unavailable and the
    /// caller should answer with backpressure rather than retrying at once.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::ShuttingDown | Self::Timeout)
    }
}

pub type Result<T> = StdResult<T, Error>;
