use crate::error::{KMeansError, Result};

/// An observation with `D` fixed coordinates and the index of the group it belongs to.
///
/// The clusterer only ever reads `coords`; `group` is written once a run succeeds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point<const D: usize> {
    pub coords: [f64; D],
    pub group: usize,
}

/// A point in the plane.
pub type Point2 = Point<2>;
/// A point in 3D space.
pub type Point3 = Point<3>;

impl<const D: usize> Point<D> {
    /// Creates a point that has not been assigned to any group yet (group 0).
    pub fn new(coords: [f64; D]) -> Self {
        Self { coords, group: 0 }
    }
}

impl<const D: usize> From<[f64; D]> for Point<D> {
    fn from(coords: [f64; D]) -> Self {
        Self::new(coords)
    }
}

impl<const D: usize> AsRef<[f64]> for Point<D> {
    fn as_ref(&self) -> &[f64] {
        &self.coords
    }
}

/// A cluster: the mean position of its members and how many members it has.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub centroid: Vec<f64>,
    pub count: usize,
}

impl Cluster {
    pub fn dims(&self) -> usize {
        self.centroid.len()
    }
}

/// Compute the squared Euclidean distance between two points of the same dimension.
/// Using squared distance to avoid unnecessary sqrt computations during comparisons.
pub fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .fold(0.0, |acc, (&x, &y)| acc + (x - y).powi(2))
}

/// Returns the index of the centroid closest to `point`.
///
/// Only a strictly smaller distance replaces the current best, so ties go to the
/// lowest index. Returns 0 when `centroids` is empty.
///
/// # Example
///
/// ```
/// use kmeans::nearest_centroid;
///
/// let centroids = vec![vec![0.0, 0.0], vec![10.0, 0.0], vec![0.0, 10.0]];
/// assert_eq!(nearest_centroid(&[1.0, 1.0], &centroids), 0);
/// assert_eq!(nearest_centroid(&[5.0, 0.0], &centroids), 0);
/// assert_eq!(nearest_centroid(&[9.0, 1.0], &centroids), 1);
/// ```
pub fn nearest_centroid<C: AsRef<[f64]>>(point: &[f64], centroids: &[C]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (idx, centroid) in centroids.iter().enumerate() {
        let dist = squared_distance(point, centroid.as_ref());
        if dist < best_dist {
            best_dist = dist;
            best = idx;
        }
    }
    best
}

/// Checks that there is at least one point and that all points share a non-zero dimension.
pub(crate) fn validate_points<P: AsRef<[f64]>>(points: &[P]) -> Result<usize> {
    let first = points
        .first()
        .ok_or_else(|| KMeansError::invalid("at least one point is required"))?;
    let dims = first.as_ref().len();
    if dims == 0 {
        return Err(KMeansError::invalid(
            "points must have at least one coordinate",
        ));
    }
    if let Some((idx, p)) = points
        .iter()
        .enumerate()
        .find(|(_, p)| p.as_ref().len() != dims)
    {
        return Err(KMeansError::invalid(format!(
            "point {} has {} coordinates, expected {}",
            idx,
            p.as_ref().len(),
            dims
        )));
    }
    Ok(dims)
}
