//! Benchmarks for the forward model and environment stepping
//!
//! Run with: cargo bench --bench kinematics

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tendril_core::kinematics::KinematicModel;
use tendril_core::sim::{ContinuumEnv, EnvConfig};

/// Benchmark forward kinematics for straight and bent configurations
fn bench_forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("Forward kinematics");
    let model = KinematicModel::default();

    group.bench_function("straight", |b| {
        b.iter(|| black_box(model.forward(black_box([-4.0, -4.0, -4.0]))))
    });

    group.bench_function("bent", |b| {
        b.iter(|| black_box(model.forward(black_box([0.0, -5.0, -8.0]))))
    });

    group.bench_function("grid sweep", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for i in 0..=11 {
                for j in 0..=11 {
                    let tip = model.forward([0.0, -(i as f64), -(j as f64)]);
                    acc += tip.z;
                }
            }
            black_box(acc)
        })
    });

    group.finish();
}

/// Benchmark environment steps with varying episode lengths
fn bench_env_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("Environment");

    group.bench_function("reset", |b| {
        let mut env = ContinuumEnv::with_config(EnvConfig::default().with_seed(1)).unwrap();
        b.iter(|| black_box(env.reset()))
    });

    for n in [10usize, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("steps", n), n, |b, &n| {
            let config = EnvConfig::default().with_seed(2).with_max_steps(n);
            let mut env = ContinuumEnv::with_config(config).unwrap();

            b.iter(|| {
                env.reset_to([0.0, 0.0, 0.0], [0.0, -11.0, -11.0]);
                for i in 0..n {
                    let d = -((i % 11) as f32);
                    black_box(env.step([-11.0, d, 0.0]).unwrap());
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_forward, bench_env_step);
criterion_main!(benches);
