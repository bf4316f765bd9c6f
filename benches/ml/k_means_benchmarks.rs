use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kmeans::{kmeans, Init, KMeansConfig, Point2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, Uniform};

/// Points scattered in polar coordinates around `groups` random centres.
fn polar_points(n: usize, groups: usize, seed: u64) -> Vec<Point2> {
    let mut rng = StdRng::seed_from_u64(seed);
    let spread = Uniform::new(-100.0, 100.0);
    let radius = Normal::new(0.0, 8.0).unwrap();
    let centres: Vec<(f64, f64)> = (0..groups)
        .map(|_| (spread.sample(&mut rng), spread.sample(&mut rng)))
        .collect();
    (0..n)
        .map(|i| {
            let (cx, cy) = centres[i % groups];
            let r: f64 = radius.sample(&mut rng);
            let theta = rng.gen_range(0.0..std::f64::consts::TAU);
            Point2::new([cx + r * theta.cos(), cy + r * theta.sin()])
        })
        .collect()
}

fn bench_seeding(c: &mut Criterion) {
    let points = polar_points(10_000, 8, 1);
    let mut group = c.benchmark_group("k_means_init");
    for init in [Init::Random, Init::KMeansPlusPlus] {
        let config = KMeansConfig::new(8).with_init(init);
        group.bench_with_input(BenchmarkId::from_parameter(init), &config, |b, config| {
            b.iter(|| {
                let mut rng = StdRng::seed_from_u64(7);
                black_box(kmeans(black_box(&points), config, &mut rng).unwrap())
            })
        });
    }
    group.finish();
}

fn bench_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("k_means_size");
    for &n in &[1_000, 10_000, 100_000] {
        let points = polar_points(n, 16, n as u64);
        for parallel in [false, true] {
            let config = KMeansConfig::new(16).with_parallel(parallel);
            let id = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(id, n), &config, |b, config| {
                b.iter(|| {
                    let mut rng = StdRng::seed_from_u64(3);
                    black_box(kmeans(black_box(&points), config, &mut rng).unwrap())
                })
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_seeding, bench_sizes);
criterion_main!(benches);
