use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cluster::config::{Init, KMeansConfig};
use crate::cluster::lloyd::{kmeans, Clustering};
use crate::cluster::point::nearest_centroid;
use crate::error::{try_with_capacity, KMeansError, Result};

/// A k-means model that is fitted once and then used to label new points.
///
/// # Fields
/// - `config`: parameters used by every call to [`KMeans::fit`].
/// - `seed`: seed for the ChaCha20 stream driving initialization. Without one,
///   each fit draws a fresh stream from OS entropy.
///
/// # Example
///
/// ```
/// use kmeans::KMeans;
///
/// let data = vec![
///     vec![0.0, 0.0],
///     vec![0.5, 0.2],
///     vec![10.0, 10.0],
///     vec![10.2, 9.7],
/// ];
///
/// let mut model = KMeans::new(2).with_seed(42);
/// model.fit(&data).unwrap();
///
/// let labels = model.predict(&[vec![0.1, 0.1], vec![9.9, 10.1]]).unwrap();
/// assert_ne!(labels[0], labels[1]);
/// ```
#[derive(Debug, Clone)]
pub struct KMeans {
    pub config: KMeansConfig,
    pub seed: Option<u64>,
    fitted: Option<Clustering>,
}

impl KMeans {
    /// Constructs an unfitted model looking for `k` clusters with default settings.
    pub fn new(k: usize) -> Self {
        Self::with_config(KMeansConfig::new(k))
    }

    pub fn with_config(config: KMeansConfig) -> Self {
        Self {
            config,
            seed: None,
            fitted: None,
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.config = self.config.with_max_iter(max_iter);
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.config = self.config.with_tolerance(tol);
        self
    }

    pub fn with_churn_threshold(mut self, max_fraction: f64) -> Self {
        self.config = self.config.with_churn_threshold(max_fraction);
        self
    }

    pub fn with_init(mut self, init: Init) -> Self {
        self.config = self.config.with_init(init);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.config = self.config.with_parallel(parallel);
        self
    }

    /// Fix the random stream so repeated fits give identical results.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Clusters `data` and keeps the result for later predictions.
    ///
    /// A failed fit keeps whatever model was fitted before.
    pub fn fit<P>(&mut self, data: &[P]) -> Result<&Clustering>
    where
        P: AsRef<[f64]> + Sync,
    {
        let mut rng = match self.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        let result = kmeans(data, &self.config, &mut rng)?;
        let fitted: &Clustering = self.fitted.insert(result);
        Ok(fitted)
    }

    /// Labels each row of `data` with the index of the nearest fitted centroid.
    ///
    /// # Errors
    ///
    /// - `NotFitted` before a successful [`KMeans::fit`].
    /// - `InvalidArgument` if a row's dimension differs from the fitted centroids'.
    pub fn predict<P: AsRef<[f64]>>(&self, data: &[P]) -> Result<Vec<usize>> {
        let fitted = self.fitted.as_ref().ok_or(KMeansError::NotFitted)?;
        let centroids = fitted.centroids();
        let dims = centroids.first().map_or(0, |c| c.len());
        if let Some((idx, row)) = data
            .iter()
            .enumerate()
            .find(|(_, row)| row.as_ref().len() != dims)
        {
            return Err(KMeansError::invalid(format!(
                "row {} has {} coordinates, model was fitted on {}",
                idx,
                row.as_ref().len(),
                dims
            )));
        }

        let mut labels = try_with_capacity("predicted labels", data.len())?;
        labels.extend(
            data.iter()
                .map(|row| nearest_centroid(row.as_ref(), &centroids)),
        );
        Ok(labels)
    }

    /// Fits on `data` and returns the training labels.
    pub fn fit_predict<P>(&mut self, data: &[P]) -> Result<Vec<usize>>
    where
        P: AsRef<[f64]> + Sync,
    {
        Ok(self.fit(data)?.labels.clone())
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    pub fn clustering(&self) -> Option<&Clustering> {
        self.fitted.as_ref()
    }

    pub fn centroids(&self) -> Option<Vec<&[f64]>> {
        self.fitted.as_ref().map(Clustering::centroids)
    }

    pub fn labels(&self) -> Option<&[usize]> {
        self.fitted.as_ref().map(|f| f.labels.as_slice())
    }
}
