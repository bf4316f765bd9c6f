//! Initial partitions for the Lloyd iteration.
//!
//! - [`random_labels`] puts every point in a uniformly random group.
//! - [`kmeans_plus_plus`] picks `k` seed centroids among the points, each one
//!   sampled with probability proportional to its squared distance from the
//!   seeds chosen so far (Arthur & Vassilvitskii, 2007).

use rand::Rng;

use crate::cluster::point::{squared_distance, validate_points};
use crate::error::{try_copied, try_filled, try_with_capacity, KMeansError, Result};

/// Assigns each of `n` points a uniformly random group in `[0, k)`.
///
/// # Errors
///
/// `InvalidArgument` if `n == 0` or `k == 0`.
pub fn random_labels<R: Rng + ?Sized>(n: usize, k: usize, rng: &mut R) -> Result<Vec<usize>> {
    if n == 0 || k == 0 {
        return Err(KMeansError::invalid(format!(
            "random labels need n >= 1 and k >= 1, got n={n} k={k}"
        )));
    }
    let mut labels = try_filled("initial labels", n, 0_usize)?;
    for label in labels.iter_mut() {
        *label = rng.gen_range(0..k);
    }
    Ok(labels)
}

/// Chooses `k` initial centroids from `points` with k-means++ sampling.
///
/// The first centroid is a uniformly random point. Each following one is drawn by
/// rolling a threshold in `[0, total)`, where `total` is the sum over all points of
/// the squared distance to their nearest chosen centroid, and walking the running
/// sum until it reaches the threshold. Rounding can leave the threshold
/// unreached, in which case the last point is taken.
///
/// # Errors
///
/// `InvalidArgument` if `k == 0`, `points` is empty, or the points do not share
/// one non-zero dimension.
pub fn kmeans_plus_plus<P, R>(points: &[P], k: usize, rng: &mut R) -> Result<Vec<Vec<f64>>>
where
    P: AsRef<[f64]>,
    R: Rng + ?Sized,
{
    if k == 0 {
        return Err(KMeansError::invalid("k must be >= 1"));
    }
    validate_points(points)?;
    let n = points.len();
    let mut centroids: Vec<Vec<f64>> = try_with_capacity("seed centroids", k)?;
    // Distance from each point to its nearest chosen centroid so far.
    let mut nearest = try_filled("seeding distances", n, f64::INFINITY)?;

    let first = rng.gen_range(0..n);
    log::trace!("k-means++ seed 0 -> point {first}");
    centroids.push(try_copied("seed centroid", points[first].as_ref())?);

    for c in 1..k {
        let last = &centroids[c - 1];
        let mut total = 0.0;
        for (dist, point) in nearest.iter_mut().zip(points.iter()) {
            let d = squared_distance(point.as_ref(), last);
            if d < *dist {
                *dist = d;
            }
            total += *dist;
        }

        let threshold = rng.gen::<f64>() * total;
        let mut cumsum = 0.0;
        let mut chosen = n - 1;
        for (idx, &dist) in nearest.iter().enumerate() {
            cumsum += dist;
            if cumsum >= threshold {
                chosen = idx;
                break;
            }
        }

        log::trace!("k-means++ seed {c} -> point {chosen} (total distance {total})");
        centroids.push(try_copied("seed centroid", points[chosen].as_ref())?);
    }

    Ok(centroids)
}
