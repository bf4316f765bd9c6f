pub mod config;
pub mod estimator;
pub mod lloyd;
pub mod point;
pub mod seeding;

// Re-export public types and functions
pub use config::{Convergence, Init, KMeansConfig};
pub use estimator::KMeans;
pub use lloyd::{cluster, kmeans, Clustering};
pub use point::{nearest_centroid, squared_distance, Cluster, Point, Point2, Point3};
pub use seeding::{kmeans_plus_plus, random_labels};
