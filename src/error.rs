//! Error types shared by every clustering entry point.

use std::collections::TryReserveError;

use thiserror::Error;

/// Errors reported by the clusterer and the [`KMeans`](crate::KMeans) model.
#[derive(Debug, Error)]
pub enum KMeansError {
    /// A caller-supplied argument or configuration value is unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A scratch or result buffer could not be reserved.
    #[error("failed to allocate {requested} elements for {what}")]
    AllocationFailure {
        what: &'static str,
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    /// `predict` was called before `fit`.
    #[error("model not fitted, call fit() first")]
    NotFitted,
}

impl KMeansError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Result type for clustering operations
pub type Result<T> = std::result::Result<T, KMeansError>;

/// Creates an empty vector able to hold `capacity` elements, reporting failure instead of aborting.
pub(crate) fn try_with_capacity<T>(what: &'static str, capacity: usize) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(capacity)
        .map_err(|source| KMeansError::AllocationFailure {
            what,
            requested: capacity,
            source,
        })?;
    Ok(buf)
}

/// Allocates a vector of `len` copies of `value`.
pub(crate) fn try_filled<T: Clone>(what: &'static str, len: usize, value: T) -> Result<Vec<T>> {
    let mut buf = try_with_capacity(what, len)?;
    buf.resize(len, value);
    Ok(buf)
}

/// Copies `coords` into a newly reserved vector.
pub(crate) fn try_copied(what: &'static str, coords: &[f64]) -> Result<Vec<f64>> {
    let mut buf = try_with_capacity(what, coords.len())?;
    buf.extend_from_slice(coords);
    Ok(buf)
}
