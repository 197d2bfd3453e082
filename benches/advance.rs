//! Benchmarks for the per-tick path.
//!
//! Run with: `cargo bench`

use burstfx::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

fn loaded_engine(capacity: usize, bursts: usize) -> BurstEngine<ManualClock> {
    let config = EngineConfig::default()
        .with_capacity(capacity)
        .with_seed(1);
    let mut engine = BurstEngine::with_clock(config, ManualClock::new()).unwrap();
    for _ in 0..bursts {
        engine.spawn_random();
    }
    engine
}

fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance");

    // 50 particles per burst against a 1000-slot buffer: 10 bursts fit, 40 overflow.
    for &bursts in &[1usize, 10, 20, 50] {
        group.bench_with_input(BenchmarkId::new("bursts", bursts), &bursts, |b, &bursts| {
            let mut engine = loaded_engine(1000, bursts);
            let mut now = Duration::ZERO;
            b.iter(|| {
                // stay below the 3s duration so nothing expires mid-benchmark
                now = (now + Duration::from_micros(1)).min(Duration::from_millis(2999));
                engine.advance(black_box(now)).unwrap();
                black_box(engine.stats().active_count)
            })
        });
    }

    group.finish();
}

fn bench_spawn(c: &mut Criterion) {
    c.bench_function("spawn_burst", |b| {
        let mut engine = loaded_engine(1000, 0);
        b.iter(|| {
            engine.spawn(black_box(Vec3::new(0.0, 2.0, 0.0))).unwrap();
            if engine.emission_count() > 1000 {
                engine.clear();
            }
        })
    });
}

criterion_group!(benches, bench_advance, bench_spawn);
criterion_main!(benches);
