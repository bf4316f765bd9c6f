use rand::Rng;
use rayon::prelude::*;

use crate::cluster::config::{Convergence, Init, KMeansConfig};
use crate::cluster::point::{
    nearest_centroid, squared_distance, validate_points, Cluster, Point,
};
use crate::cluster::seeding::{kmeans_plus_plus, random_labels};
use crate::error::{try_copied, try_filled, try_with_capacity, KMeansError, Result};

/// The outcome of a clustering run, owned by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    /// One entry per produced cluster. There are `min(k, n)` of them.
    pub clusters: Vec<Cluster>,
    /// Index into `clusters` for every input point, in input order.
    pub labels: Vec<usize>,
    /// Lloyd iterations performed (0 when the size policy skipped iteration).
    pub iterations: usize,
    /// False only when `max_iter` was reached before the stopping rule held.
    pub converged: bool,
}

impl Clustering {
    /// Effective number of clusters.
    pub fn k(&self) -> usize {
        self.clusters.len()
    }

    pub fn centroids(&self) -> Vec<&[f64]> {
        self.clusters.iter().map(|c| c.centroid.as_slice()).collect()
    }

    pub fn counts(&self) -> Vec<usize> {
        self.clusters.iter().map(|c| c.count).collect()
    }

    /// Sum of squared distances from each point to the centroid it is assigned to.
    ///
    /// `points` must be the data this clustering was computed from: one point per
    /// label, each with the centroids' dimension. Anything else is `InvalidArgument`.
    pub fn inertia<P: AsRef<[f64]>>(&self, points: &[P]) -> Result<f64> {
        if points.len() != self.labels.len() {
            return Err(KMeansError::invalid(format!(
                "got {} points, clustering has {} labels",
                points.len(),
                self.labels.len()
            )));
        }
        let dims = self.clusters.first().map_or(0, Cluster::dims);
        let mut total = 0.0;
        for (idx, (p, &l)) in points.iter().zip(self.labels.iter()).enumerate() {
            let p = p.as_ref();
            if p.len() != dims {
                return Err(KMeansError::invalid(format!(
                    "point {} has {} coordinates, clustering has {}",
                    idx,
                    p.len(),
                    dims
                )));
            }
            total += squared_distance(p, &self.clusters[l].centroid);
        }
        Ok(total)
    }
}

/// Runs k-means on `points`, returning the clusters and a parallel label vector.
///
/// How the run proceeds depends on how `k` compares with the number of points `n`:
///
/// - `k <= 1`: a single cluster at the mean of all points, every label 0.
/// - `1 < k < n`: Lloyd's algorithm seeded per `config.init`, stopping per
///   `config.convergence` or after `config.max_iter` iterations.
/// - `k >= n`: every point is its own cluster; only `n` clusters are returned.
///
/// The random stream is only drawn from in the Lloyd case, so runs with equal
/// input, config and stream state produce equal results.
///
/// # Errors
///
/// - `InvalidArgument` if `points` is empty, a point has no coordinates, points
///   differ in dimension, or the config is invalid (`k == 0`, `max_iter == 0`, ...).
/// - `AllocationFailure` if a working buffer cannot be reserved.
///
/// # Example
///
/// ```
/// use kmeans::{kmeans, KMeansConfig};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
///
/// let data = vec![
///     vec![1.0, 2.0],
///     vec![1.5, 1.8],
///     vec![5.0, 8.0],
///     vec![8.0, 8.0],
///     vec![1.0, 0.6],
///     vec![9.0, 11.0],
/// ];
///
/// let config = KMeansConfig::new(2);
/// let mut rng = ChaCha20Rng::seed_from_u64(7);
/// let result = kmeans(&data, &config, &mut rng).unwrap();
///
/// assert_eq!(result.k(), 2);
/// assert_eq!(result.labels.len(), data.len());
/// assert_eq!(result.counts().iter().sum::<usize>(), data.len());
/// ```
pub fn kmeans<P, R>(points: &[P], config: &KMeansConfig, rng: &mut R) -> Result<Clustering>
where
    P: AsRef<[f64]> + Sync,
    R: Rng + ?Sized,
{
    config.validate()?;
    let dims = validate_points(points)?;
    let n = points.len();

    log::debug!(
        "k-means: n={} k={} dims={} init={} max_iter={}",
        n,
        config.k,
        dims,
        config.init,
        config.max_iter
    );

    if config.k <= 1 {
        single_cluster(points, dims)
    } else if config.k < n {
        lloyd(points, dims, config, rng)
    } else {
        one_cluster_per_point(points)
    }
}

/// Runs k-means on fixed-dimension points and writes each point's `group` in place.
///
/// Groups are only written once the run has succeeded; on error the points are untouched.
/// See [`kmeans`] for the size policies and errors.
///
/// # Example
///
/// ```
/// use kmeans::{cluster, KMeansConfig, Point2};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
///
/// let mut points: Vec<Point2> = vec![
///     Point2::new([0.0, 0.0]),
///     Point2::new([0.2, 0.1]),
///     Point2::new([10.0, 10.0]),
///     Point2::new([10.1, 9.9]),
/// ];
///
/// let mut rng = ChaCha20Rng::seed_from_u64(1);
/// let clusters = cluster(&mut points, &KMeansConfig::new(2), &mut rng).unwrap();
///
/// assert_eq!(clusters.len(), 2);
/// assert_eq!(points[0].group, points[1].group);
/// assert_ne!(points[0].group, points[2].group);
/// ```
pub fn cluster<const D: usize, R>(
    points: &mut [Point<D>],
    config: &KMeansConfig,
    rng: &mut R,
) -> Result<Vec<Cluster>>
where
    R: Rng + ?Sized,
{
    let result = kmeans(&*points, config, rng)?;
    for (point, &label) in points.iter_mut().zip(result.labels.iter()) {
        point.group = label;
    }
    Ok(result.clusters)
}

/// `k <= 1`: one cluster holding everything.
fn single_cluster<P: AsRef<[f64]>>(points: &[P], dims: usize) -> Result<Clustering> {
    let n = points.len();
    let labels = try_filled("labels", n, 0_usize)?;
    let mut centroid = try_filled("centroid", dims, 0.0)?;
    for point in points {
        for (c, &x) in centroid.iter_mut().zip(point.as_ref()) {
            *c += x;
        }
    }
    for c in centroid.iter_mut() {
        *c /= n as f64;
    }
    let mut clusters = try_with_capacity("clusters", 1)?;
    clusters.push(Cluster { centroid, count: n });
    Ok(Clustering {
        clusters,
        labels,
        iterations: 0,
        converged: true,
    })
}

/// `k >= n`: each point becomes its own cluster.
fn one_cluster_per_point<P: AsRef<[f64]>>(points: &[P]) -> Result<Clustering> {
    let n = points.len();
    let mut clusters = try_with_capacity("clusters", n)?;
    let mut labels = try_with_capacity("labels", n)?;
    for (idx, point) in points.iter().enumerate() {
        clusters.push(Cluster {
            centroid: try_copied("centroid", point.as_ref())?,
            count: 1,
        });
        labels.push(idx);
    }
    Ok(Clustering {
        clusters,
        labels,
        iterations: 0,
        converged: true,
    })
}

/// Working buffers for one Lloyd run.
struct Workspace {
    dims: usize,
    /// Row-major `k x dims` coordinate sums.
    sums: Vec<f64>,
    counts: Vec<usize>,
    /// Nearest-centroid results of the parallel assignment pass.
    next_labels: Vec<usize>,
}

impl Workspace {
    fn new(n: usize, k: usize, dims: usize, parallel: bool) -> Result<Self> {
        let len = k
            .checked_mul(dims)
            .ok_or_else(|| KMeansError::invalid("k * dims overflows usize"))?;
        Ok(Self {
            dims,
            sums: try_filled("centroid sums", len, 0.0)?,
            counts: try_filled("cluster counts", k, 0_usize)?,
            next_labels: if parallel {
                try_filled("parallel labels", n, 0_usize)?
            } else {
                Vec::new()
            },
        })
    }

    /// Per-cluster coordinate sums and member counts for the given labels, in point order.
    fn accumulate<P: AsRef<[f64]>>(&mut self, points: &[P], labels: &[usize]) {
        let dims = self.dims;
        self.sums.fill(0.0);
        self.counts.fill(0);
        for (point, &label) in points.iter().zip(labels.iter()) {
            self.counts[label] += 1;
            let sum = &mut self.sums[label * dims..(label + 1) * dims];
            for (s, &x) in sum.iter_mut().zip(point.as_ref()) {
                *s += x;
            }
        }
    }

    /// Moves every non-empty cluster's centroid to the mean of its members and
    /// returns the largest squared displacement. Empty clusters stay where they are.
    fn update_centroids(&self, centroids: &mut [Vec<f64>]) -> f64 {
        let dims = self.dims;
        let mut max_shift_sq: f64 = 0.0;
        for (c, centroid) in centroids.iter_mut().enumerate() {
            let count = self.counts[c];
            if count == 0 {
                continue;
            }
            let mut shift_sq = 0.0;
            for (x, &s) in centroid
                .iter_mut()
                .zip(self.sums[c * dims..(c + 1) * dims].iter())
            {
                let mean = s / count as f64;
                shift_sq += (mean - *x).powi(2);
                *x = mean;
            }
            max_shift_sq = max_shift_sq.max(shift_sq);
        }
        max_shift_sq
    }

    /// Reassigns every point to its nearest centroid and returns how many points moved.
    ///
    /// The parallel pass reads the same frozen centroids and merges its results in
    /// point order, so it is indistinguishable from the sequential one.
    fn assign<P: AsRef<[f64]> + Sync>(
        &mut self,
        points: &[P],
        centroids: &[Vec<f64>],
        labels: &mut [usize],
        parallel: bool,
    ) -> usize {
        let mut churn = 0;
        if parallel {
            points
                .par_iter()
                .map(|p| nearest_centroid(p.as_ref(), centroids))
                .collect_into_vec(&mut self.next_labels);
            for (label, &next) in labels.iter_mut().zip(self.next_labels.iter()) {
                if *label != next {
                    *label = next;
                    churn += 1;
                }
            }
        } else {
            for (label, point) in labels.iter_mut().zip(points.iter()) {
                let next = nearest_centroid(point.as_ref(), centroids);
                if *label != next {
                    *label = next;
                    churn += 1;
                }
            }
        }
        churn
    }
}

/// `1 < k < n`: seed, then alternate centroid update and reassignment.
fn lloyd<P, R>(points: &[P], dims: usize, config: &KMeansConfig, rng: &mut R) -> Result<Clustering>
where
    P: AsRef<[f64]> + Sync,
    R: Rng + ?Sized,
{
    let n = points.len();
    let k = config.k;
    let mut ws = Workspace::new(n, k, dims, config.parallel)?;

    let (mut labels, mut centroids) = match config.init {
        Init::Random => {
            let labels = random_labels(n, k, rng)?;
            let mut centroids = try_with_capacity("centroids", k)?;
            for _ in 0..k {
                centroids.push(try_filled("centroid", dims, 0.0)?);
            }
            (labels, centroids)
        }
        Init::KMeansPlusPlus => {
            let centroids = kmeans_plus_plus(points, k, rng)?;
            let mut labels = try_filled("labels", n, 0_usize)?;
            ws.assign(points, &centroids, &mut labels, config.parallel);
            (labels, centroids)
        }
    };

    let churn_limit = match config.convergence {
        Convergence::Churn { max_fraction } => (n as f64 * max_fraction) as usize,
        Convergence::Shift { .. } => 0,
    };

    // Random seeding starts from placeholder centroids, so the first update is not a movement.
    let mut placeholder_centroids = config.init == Init::Random;
    let mut iterations = 0;
    let mut converged = false;
    let mut churn = 0;
    while iterations < config.max_iter {
        iterations += 1;

        ws.accumulate(points, &labels);
        let mut max_shift = ws.update_centroids(&mut centroids).sqrt();
        if placeholder_centroids {
            max_shift = f64::INFINITY;
            placeholder_centroids = false;
        }
        churn = ws.assign(points, &centroids, &mut labels, config.parallel);

        log::debug!(
            "k-means iteration {}: max centroid shift {:.3e}, {} points moved",
            iterations,
            max_shift,
            churn
        );

        // No point moved: the next update would reproduce these centroids exactly.
        let settled = churn == 0
            || match config.convergence {
                Convergence::Shift { tol } => max_shift < tol,
                Convergence::Churn { .. } => churn <= churn_limit,
            };
        if settled {
            converged = true;
            break;
        }
    }

    if !converged {
        log::warn!(
            "k-means stopped at max_iter={} before converging ({} points still moving)",
            config.max_iter,
            churn
        );
    }

    // Centroids must be the means of the final labels.
    if churn > 0 {
        ws.accumulate(points, &labels);
        ws.update_centroids(&mut centroids);
    }

    let mut clusters = try_with_capacity("clusters", k)?;
    for (centroid, &count) in centroids.into_iter().zip(ws.counts.iter()) {
        clusters.push(Cluster { centroid, count });
    }

    log::debug!(
        "k-means finished after {} iterations (converged: {})",
        iterations,
        converged
    );

    Ok(Clustering {
        clusters,
        labels,
        iterations,
        converged,
    })
}
