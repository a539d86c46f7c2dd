use bp::Factory;
use bp_bench::{contend, loop_factorial20, Contention, IntFactory, Unhealthy, TIMEOUT};
use criterion::Bencher;
use r2d2::{ManageConnection, Pool};
use std::time::Instant;

/// Drives r2d2 with the same factory, so both pools create and health-check
/// resources identically.
struct Adapter(IntFactory);

impl ManageConnection for Adapter {
    type Connection = i32;
    type Error = Unhealthy;

    fn connect(&self) -> Result<Self::Connection, Self::Error> {
        self.0.try_create().map_err(|never| match never {})
    }

    fn is_valid(&self, int: &mut Self::Connection) -> Result<(), Self::Error> {
        if self.0.is_healthy(int) {
            Ok(())
        } else {
            Err(Unhealthy)
        }
    }

    fn has_broken(&self, int: &mut Self::Connection) -> bool {
        !self.0.is_healthy(int)
    }
}

pub fn bench_with_input(bencher: &mut Bencher, input: &Contention) {
    bencher.iter_custom(|iters| {
        // eager, bounded, and validated on every checkout like `bp::Pool`
        let pool = Pool::builder()
            .max_size(input.capacity as u32)
            .min_idle(Some(input.capacity as u32))
            .connection_timeout(TIMEOUT)
            .test_on_check_out(true)
            .build(Adapter(IntFactory))
            .unwrap();
        let start = Instant::now();
        for _ in 0..iters {
            contend(input.workers, || {
                let int = pool.get().unwrap();
                loop_factorial20();
                criterion::black_box(*int);
            });
        }
        start.elapsed()
    })
}
