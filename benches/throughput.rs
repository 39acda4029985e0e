use std::sync::Arc;
use std::thread;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pcmatrix::coordinator::CoordinationContext;
use pcmatrix::matrix::{GenerationMode, RandomProvider};

const PAIRS: usize = 4;
const MATRICES_PER_PRODUCER: usize = 2_000;

fn run_once(capacity: usize) -> usize {
    let ctx = Arc::new(CoordinationContext::new(
        capacity,
        PAIRS * MATRICES_PER_PRODUCER,
    ));
    let provider = Arc::new(RandomProvider::new(GenerationMode::Random));
    let mut producers = vec![];
    let mut consumers = vec![];

    for _ in 0..PAIRS {
        let ctx_p = Arc::clone(&ctx);
        let provider = Arc::clone(&provider);
        producers.push(thread::spawn(move || {
            ctx_p.produce(provider.as_ref(), MATRICES_PER_PRODUCER)
        }));

        let ctx_c = Arc::clone(&ctx);
        consumers.push(thread::spawn(move || ctx_c.consume()));
    }

    for handle in producers {
        handle.join().unwrap();
    }
    consumers
        .into_iter()
        .map(|h| h.join().unwrap().multiplied)
        .sum()
}

fn bench_capacity(c: &mut Criterion) {
    let mut group = c.benchmark_group("bounded_buffer_run");
    group.sample_size(20);

    for capacity in [1, 8, 64, 512] {
        group.bench_with_input(
            BenchmarkId::new(
                format!("{}pairs x {}matrices", PAIRS, MATRICES_PER_PRODUCER),
                capacity,
            ),
            &capacity,
            |b, &capacity| b.iter(|| black_box(run_once(capacity))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_capacity);
criterion_main!(benches);
