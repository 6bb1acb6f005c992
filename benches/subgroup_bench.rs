//! Criterion benchmarks for u-subgroup.
//!
//! Uses synthetic survey data: ordinal attributes drawn uniformly and
//! rankings drawn as uniform random permutations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use u_subgroup::beam::{BeamConfig, BeamRunner};
use u_subgroup::dataset::Dataset;
use u_subgroup::preference::{compute_pm, PmScore};

fn synthetic(subjects: usize, items: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let names = ["age", "region", "income"];
    let levels = [6u32, 4, 5];
    let attrs: Vec<Vec<String>> = (0..subjects)
        .map(|_| {
            levels
                .iter()
                .map(|&l| rng.random_range(0..l).to_string())
                .collect()
        })
        .collect();
    let ranks: Vec<Vec<u32>> = (0..subjects)
        .map(|_| {
            let mut row: Vec<u32> = (1..=items as u32).collect();
            row.shuffle(&mut rng);
            row
        })
        .collect();
    let item_names: Vec<String> = (0..items).map(|i| format!("item{i}")).collect();
    let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
    Dataset::new(&names, &attrs, &item_names, &ranks).expect("synthetic dataset is valid")
}

fn bench_compute_pm(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_pm");
    for &subjects in &[100usize, 1000, 5000] {
        let data = synthetic(subjects, 10, 1);
        group.bench_with_input(BenchmarkId::from_parameter(subjects), &data, |b, data| {
            b.iter(|| compute_pm(black_box(data.ranks())))
        });
    }
    group.finish();
}

fn bench_beam_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("beam_search");
    group.sample_size(10);
    for &width in &[1usize, 5, 10] {
        let data = synthetic(500, 10, 2);
        let config = BeamConfig::default()
            .with_beam_width(width)
            .with_max_iter(5)
            .with_seed(3);
        group.bench_with_input(BenchmarkId::from_parameter(width), &config, |b, config| {
            b.iter(|| BeamRunner::run(black_box(&data), &PmScore::default(), config))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compute_pm, bench_beam_search);
criterion_main!(benches);
