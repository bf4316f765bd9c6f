//! Lloyd's k-means clustering for points of any fixed dimension.
//!
//! - [`kmeans`] clusters a slice of points and returns an owned [`Clustering`].
//! - [`cluster`] does the same for [`Point`]s and writes each point's group in place.
//! - [`KMeans`] wraps a seeded run in a fit / predict model.
//! - [`nearest_centroid`] answers the nearest-centroid query on its own.
//!
//! Seeding is either uniformly random or k-means++, selected through [`KMeansConfig`].
//! Randomness always comes from a caller-supplied [`rand::Rng`].

pub mod cluster;
pub mod error;

pub use cluster::{
    cluster, kmeans, kmeans_plus_plus, nearest_centroid, random_labels, squared_distance, Cluster,
    Clustering, Convergence, Init, KMeans, KMeansConfig, Point, Point2, Point3,
};
pub use error::{KMeansError, Result};
