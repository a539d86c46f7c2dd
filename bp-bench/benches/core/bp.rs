use bp::Pool;
use bp_bench::{contend, loop_factorial20, Contention, IntFactory, TIMEOUT};
use criterion::Bencher;
use std::time::Instant;

pub fn bench_with_input(bencher: &mut Bencher, input: &Contention) {
    bencher.iter_custom(|iters| {
        let pool = Pool::new(IntFactory, input.capacity).unwrap();
        let start = Instant::now();
        for _ in 0..iters {
            contend(input.workers, || {
                let int = pool.acquire(TIMEOUT).unwrap();
                loop_factorial20();
                criterion::black_box(*int);
            });
        }
        start.elapsed()
    })
}
