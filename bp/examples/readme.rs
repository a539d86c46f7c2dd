use bp::{Factory, Lease, Pool};
use std::time::Duration;

pub struct IntFactory;

#[derive(Debug, thiserror::Error)]
#[error("cannot create an int")]
pub struct IntError;

impl Factory for IntFactory {
    type Output = i32;
    type Error = IntError;

    fn try_create(&self) -> Result<Self::Output, Self::Error> {
        Ok(0)
    }

    fn is_healthy(&self, resource: &Self::Output) -> bool {
        resource >= &0
    }
}

fn main() -> bp::Result<()> {
    tracing_subscriber::fmt::init();

    let pool = Pool::new(IntFactory, 1)?; // capacity=1, created eagerly
    let timeout = Duration::from_secs(1);

    let mut int = pool.acquire(timeout)?;
    *int = 1;
    dbg!(*int); // 1
    dbg!(Lease::is_healthy(&int)); // true
    drop(int); // back to the pool

    let mut int = pool.acquire(timeout)?;
    dbg!(*int); // 1; same resource as before.
    *int = -1;
    dbg!(Lease::is_healthy(&int)); // false
    drop(int); // unhealthy, so it is destroyed instead of returned.

    let int = pool.acquire(timeout)?;
    dbg!(*int); // 0; the vacant slot got a fresh resource.

    // hold the only resource and watch a second acquire time out.
    dbg!(pool.acquire(Duration::from_millis(10)).unwrap_err()); // Timeout

    // take the resource out of the pool.
    let raw_int: i32 = Lease::detach(int);
    dbg!(raw_int); // 0

    pool.shutdown();
    dbg!(pool.acquire(timeout).unwrap_err()); // ShuttingDown
    Ok(())
}
