use std::fmt;

use crate::error::{KMeansError, Result};

/// Strategy used to seed the first iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Init {
    /// Every point starts in a uniformly random group.
    Random,
    /// k-means++: spread the initial centroids by sampling proportionally to squared distance.
    #[default]
    KMeansPlusPlus,
}

impl fmt::Display for Init {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Init::Random => write!(f, "random"),
            Init::KMeansPlusPlus => write!(f, "kmeans++"),
        }
    }
}

/// Rule deciding when the Lloyd iteration has settled.
///
/// Both rules are additionally capped by [`KMeansConfig::max_iter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Convergence {
    /// Stop once no centroid moved by `tol` or more (Euclidean distance) in an iteration.
    Shift { tol: f64 },
    /// Stop once at most `floor(n * max_fraction)` points changed group in an iteration.
    Churn { max_fraction: f64 },
}

impl Convergence {
    /// The churn rule at its usual threshold: at most one point in ten thousand moves.
    pub fn churn() -> Self {
        Convergence::Churn { max_fraction: 1e-4 }
    }
}

impl Default for Convergence {
    fn default() -> Self {
        Convergence::Shift { tol: 1e-4 }
    }
}

/// Configuration options for k-means clustering.
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Number of clusters to find.
    pub k: usize,
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// How the initial partition is chosen.
    pub init: Init,
    /// When to stop iterating before `max_iter`.
    pub convergence: Convergence,
    /// Assign points to centroids on the rayon thread pool.
    pub parallel: bool,
}

impl KMeansConfig {
    /// Create a new config with default values for max_iter (300), k-means++ seeding
    /// and a centroid-shift tolerance of 1e-4.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 300,
            init: Init::default(),
            convergence: Convergence::default(),
            parallel: false,
        }
    }

    /// Customize the maximum number of iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Stop when every centroid moves less than `tol` in one iteration.
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.convergence = Convergence::Shift { tol };
        self
    }

    /// Stop when at most `max_fraction` of the points change group in one iteration.
    pub fn with_churn_threshold(mut self, max_fraction: f64) -> Self {
        self.convergence = Convergence::Churn { max_fraction };
        self
    }

    pub fn with_init(mut self, init: Init) -> Self {
        self.init = init;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(KMeansError::invalid("k must be >= 1"));
        }
        if self.max_iter == 0 {
            return Err(KMeansError::invalid("max_iter must be >= 1"));
        }
        match self.convergence {
            Convergence::Shift { tol } if !tol.is_finite() || tol < 0.0 => Err(
                KMeansError::invalid(format!("tolerance must be finite and >= 0, got {tol}")),
            ),
            Convergence::Churn { max_fraction } if !(0.0..=1.0).contains(&max_fraction) => {
                Err(KMeansError::invalid(format!(
                    "churn fraction must be in [0, 1], got {max_fraction}"
                )))
            }
            _ => Ok(()),
        }
    }
}
