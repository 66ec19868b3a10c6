//! Criterion benchmarks for u-evolve operators and the evolver loop.
//!
//! Uses synthetic problems (Sphere function, OneMax) and random
//! permutations to measure operator and loop overhead.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_evolve::decoding::{decode_gray, DecodingKey};
use u_evolve::evolver::{Evolver, EvolverConfig, Individual};
use u_evolve::genotype::{BitString, FloatVector, IntegerVector};
use u_evolve::ops::bit_string::{FlipBitMutation, InitBitString};
use u_evolve::ops::float::{BlendCrossover, GaussianMutation, InitUniform};
use u_evolve::ops::generic::TwoPointsCrossover;
use u_evolve::ops::integer::InitPermutation;
use u_evolve::ops::permutation::{
    CycleCrossover, NwoxCrossover, OrderCrossover, PmxCrossover, UpmxCrossover,
};
use u_evolve::ops::{Crossover, Initializer, PerIndex};
use u_evolve::random::create_rng;

fn onemax(ind: &Individual<BitString>) -> f64 {
    ind.genotypes[0].count_ones() as f64
}

fn sphere(ind: &Individual<FloatVector>) -> f64 {
    -ind.genotypes[0].as_slice().iter().map(|x| x * x).sum::<f64>()
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_permutation_crossovers(c: &mut Criterion) {
    let mut group = c.benchmark_group("permutation_crossover");

    fn run<C: Crossover<IntegerVector>>(
        group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>,
        name: &str,
        op: C,
        n: usize,
    ) {
        let mut rng = create_rng(42);
        let init = InitPermutation::new(n);
        let p1 = init.initialize(&mut rng).expect("valid size");
        let p2 = init.initialize(&mut rng).expect("valid size");
        group.bench_with_input(BenchmarkId::new(name, n), &(p1, p2), |b, (p1, p2)| {
            b.iter(|| {
                let (mut a, mut c) = (p1.clone(), p2.clone());
                op.mate(black_box(&mut a), black_box(&mut c), &mut rng)
                    .expect("same length");
                black_box((a, c))
            })
        });
    }

    for &n in &[50, 500] {
        run(&mut group, "cx", CycleCrossover, n);
        run(&mut group, "pmx", PmxCrossover, n);
        run(&mut group, "ox", OrderCrossover, n);
        run(&mut group, "nwox", NwoxCrossover, n);
        run(&mut group, "upmx", UpmxCrossover::default(), n);
    }
    group.finish();
}

fn bench_gray_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("gray_decode");

    for &vars in &[10usize, 100] {
        let keys = vec![DecodingKey::new(-5.0, 5.0, 16); vars];
        let mut rng = create_rng(42);
        let bits = InitBitString::new(vars * 16)
            .initialize(&mut rng)
            .expect("valid size");
        group.bench_with_input(BenchmarkId::from_parameter(vars), &(keys, bits), |b, (k, g)| {
            b.iter(|| black_box(decode_gray(black_box(k), black_box(g.as_slice()))))
        });
    }
    group.finish();
}

fn bench_evolver_onemax(c: &mut Criterion) {
    let mut group = c.benchmark_group("evolver_onemax");
    group.sample_size(10);

    for &n in &[20, 100] {
        let evolver = Evolver::new(
            EvolverConfig::default()
                .with_population_size(100)
                .with_max_generations(50)
                .with_stagnation_limit(0)
                .with_seed(42),
            InitBitString::new(n),
            FlipBitMutation::new(1.0 / n as f64),
            TwoPointsCrossover,
        );
        group.bench_with_input(BenchmarkId::from_parameter(n), &evolver, |b, e| {
            b.iter(|| black_box(e.run(&onemax)))
        });
    }
    group.finish();
}

fn bench_evolver_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("evolver_sphere");
    group.sample_size(10);

    for (dim, pop, gen) in [(10usize, 50usize, 50usize), (50, 100, 30)] {
        let evolver = Evolver::new(
            EvolverConfig {
                population_size: pop,
                max_generations: gen,
                seed: Some(42),
                ..EvolverConfig::default()
            },
            InitUniform::new(dim, PerIndex::splat(-5.0), PerIndex::splat(5.0)),
            GaussianMutation::new(0.2, PerIndex::splat(0.3)),
            BlendCrossover::new(0.5),
        );
        group.bench_with_input(
            BenchmarkId::new(format!("d{}_p{}_g{}", dim, pop, gen), dim),
            &evolver,
            |b, e| b.iter(|| black_box(e.run(&sphere))),
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_permutation_crossovers,
    bench_gray_decode,
    bench_evolver_onemax,
    bench_evolver_sphere
);
criterion_main!(benches);
