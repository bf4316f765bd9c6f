use approx::assert_abs_diff_eq;
use kmeans::{
    cluster, kmeans, nearest_centroid, Init, KMeans, KMeansConfig, KMeansError, Point2, Point3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn jittered_blobs(centres: &[[f64; 2]], per_blob: usize, jitter: f64, seed: u64) -> Vec<Point2> {
    let mut rng = StdRng::seed_from_u64(seed);
    centres
        .iter()
        .flat_map(|c| {
            (0..per_blob)
                .map(|_| {
                    Point2::new([
                        c[0] + rng.gen_range(-jitter..jitter),
                        c[1] + rng.gen_range(-jitter..jitter),
                    ])
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

#[test]
fn nine_points_three_clusters() {
    let centres = [[0.0, 0.0], [10.0, 10.0], [-10.0, 10.0]];
    let mut points = jittered_blobs(&centres, 3, 0.3, 1);
    let mut rng = ChaCha20Rng::seed_from_u64(2024);

    let clusters = cluster(&mut points, &KMeansConfig::new(3), &mut rng).unwrap();

    assert_eq!(clusters.len(), 3);
    assert!(clusters.iter().all(|c| c.count == 3));
    for centre in &centres {
        let c = nearest_centroid(centre, &clusters.iter().map(|c| &c.centroid).collect::<Vec<_>>());
        assert_abs_diff_eq!(clusters[c].centroid[0], centre[0], epsilon = 0.3);
        assert_abs_diff_eq!(clusters[c].centroid[1], centre[1], epsilon = 0.3);
    }
    for blob in points.chunks(3) {
        assert!(blob.iter().all(|p| p.group == blob[0].group));
    }
}

#[test]
fn counts_are_conserved_across_policies() {
    let points = jittered_blobs(&[[0.0, 0.0], [5.0, 5.0]], 25, 2.0, 3);
    for k in [1, 2, 7, 49, 50, 51, 500] {
        for init in [Init::Random, Init::KMeansPlusPlus] {
            let config = KMeansConfig::new(k).with_init(init);
            let mut rng = StdRng::seed_from_u64(k as u64);
            let result = kmeans(&points, &config, &mut rng).unwrap();
            assert_eq!(result.counts().iter().sum::<usize>(), points.len());
            assert_eq!(result.k(), k.min(points.len()));
            assert!(result.labels.iter().all(|&l| l < result.k()));
        }
    }
}

#[test]
fn three_dimensional_points() {
    let mut points: Vec<Point3> = Vec::new();
    for i in 0..10 {
        let t = i as f64 * 0.1;
        points.push(Point3::new([t, -t, 0.5 * t]));
        points.push(Point3::new([20.0 + t, 20.0, -20.0 - t]));
    }
    let mut rng = ChaCha20Rng::seed_from_u64(8);
    let clusters = cluster(&mut points, &KMeansConfig::new(2), &mut rng).unwrap();
    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].count, 10);
    assert_eq!(clusters[1].count, 10);
    assert!(clusters.iter().all(|c| c.dims() == 3));
    assert_ne!(points[0].group, points[1].group);
}

#[test]
fn run_time_dimension() {
    let data: Vec<Vec<f64>> = (0..60)
        .map(|i| {
            let base = if i % 2 == 0 { 0.0 } else { 50.0 };
            (0..5).map(|d| base + ((i * 7 + d) % 5) as f64 * 0.1).collect()
        })
        .collect();
    let mut rng = StdRng::seed_from_u64(12);
    let result = kmeans(&data, &KMeansConfig::new(2), &mut rng).unwrap();
    assert_eq!(result.counts(), vec![30, 30]);
    assert!(result.clusters.iter().all(|c| c.dims() == 5));
}

#[test]
fn estimator_round_trip() {
    let points = jittered_blobs(&[[0.0, 0.0], [10.0, 10.0]], 50, 1.0, 42);
    let mut model = KMeans::new(2).with_seed(42).with_max_iter(100);
    model.fit(&points).unwrap();

    let predictions = model.predict(&[[0.0, 0.0], [10.0, 10.0]]).unwrap();
    assert_eq!(predictions.len(), 2);
    assert_ne!(predictions[0], predictions[1]);

    let labels = model.fit_predict(&points).unwrap();
    assert_eq!(labels.len(), 100);
    assert_eq!(labels.as_slice(), model.labels().unwrap());
}

#[test]
fn errors() {
    let mut rng = StdRng::seed_from_u64(0);
    let none: Vec<Point2> = Vec::new();
    assert!(matches!(
        kmeans(&none, &KMeansConfig::new(2), &mut rng),
        Err(KMeansError::InvalidArgument(_))
    ));
    let points = jittered_blobs(&[[0.0, 0.0]], 4, 1.0, 0);
    assert!(matches!(
        kmeans(&points, &KMeansConfig::new(0), &mut rng),
        Err(KMeansError::InvalidArgument(_))
    ));
    assert!(matches!(
        KMeans::new(2).predict(&points),
        Err(KMeansError::NotFitted)
    ));
}
