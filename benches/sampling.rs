use criterion::{black_box, criterion_group, criterion_main, Criterion};
use probsim::probability::ProbabilitySpace;
use probsim::random::RandomEngine;
use probsim::sampling::{self, SamplingStrategy};

fn space(d: usize) -> ProbabilitySpace {
    ProbabilitySpace::from_weights((0..d).map(|j| (format!("d{}", j), (j as f64 + 1.0) / (d as f64 + 1.0))))
        .unwrap()
}

fn bench_random_engine(c: &mut Criterion) {
    let mut rng = RandomEngine::new(Some(42));

    c.bench_function("next_float", |b| {
        b.iter(|| black_box(rng.next_float()))
    });

    c.bench_function("next_normal", |b| {
        b.iter(|| black_box(rng.next_normal()))
    });

    c.bench_function("next_beta_11_11", |b| {
        b.iter(|| black_box(rng.next_beta(black_box(11.0), black_box(11.0))))
    });

    c.bench_function("halton_base3", |b| {
        let mut i = 0u64;
        b.iter(|| {
            i += 1;
            black_box(RandomEngine::halton(black_box(i), 3))
        })
    });
}

fn bench_strategies(c: &mut Criterion) {
    for &d in &[2, 8] {
        let space = space(d);
        let mut group = c.benchmark_group(format!("draw_1000x{}", d));

        for strategy in SamplingStrategy::ALL {
            let mut rng = RandomEngine::new(Some(7));
            group.bench_function(strategy.as_str(), |b| {
                b.iter(|| black_box(sampling::draw(strategy, &space, 1_000, &mut rng)))
            });
        }

        group.finish();
    }
}

criterion_group!(benches, bench_random_engine, bench_strategies);
criterion_main!(benches);
