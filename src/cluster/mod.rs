//! K-Means clustering (Lloyd's algorithm).
//!
//! Initial centroids are k data points drawn uniformly at random with
//! replacement; unseeded runs are nondeterministic, so callers who need
//! reproducibility inject a seed with [`KMeans::with_random_state`].

use crate::error::{EngineError, Result};
use crate::metrics::inertia;
use crate::primitives::Matrix;
use crate::traits::UnsupervisedEstimator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Default number of clusters for learner segmentation.
pub const DEFAULT_CLUSTERS: usize = 4;

/// Default iteration cap.
pub const DEFAULT_MAX_ITER: usize = 100;

/// K-Means clustering configuration.
///
/// `fit` returns an immutable [`KMeansModel`]; the configuration itself
/// never holds fitted state.
///
/// # Algorithm
///
/// 1. Draw k data points uniformly at random (with replacement) as the
///    initial centroids
/// 2. Assign each sample to the nearest centroid (squared Euclidean
///    distance, ties to the lowest centroid index)
/// 3. Update each centroid to the mean of its assigned samples; an empty
///    cluster keeps its previous position
/// 4. Stop when the assignment vector repeats or the iteration cap hits
///
/// # Examples
///
/// ```
/// use pronostico::prelude::*;
///
/// let data = Matrix::from_vec(6, 2, vec![
///     1.0, 2.0,
///     1.5, 1.8,
///     1.0, 0.6,
///     8.0, 8.0,
///     9.0, 11.0,
///     8.5, 9.0,
/// ]).unwrap();
///
/// let model = KMeans::new(2).with_random_state(42).fit(&data).unwrap();
/// assert_eq!(model.labels().len(), 6);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KMeans {
    /// Number of clusters.
    n_clusters: usize,
    /// Maximum iterations.
    max_iter: usize,
    /// Random seed for initialization.
    random_state: Option<u64>,
}

impl Default for KMeans {
    fn default() -> Self {
        Self::new(DEFAULT_CLUSTERS)
    }
}

impl KMeans {
    /// Creates a new K-Means configuration with the given cluster count.
    #[must_use]
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            max_iter: DEFAULT_MAX_ITER,
            random_state: None,
        }
    }

    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter.max(1);
        self
    }

    /// Sets the random seed for reproducible initialization.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Draws k initial centroids uniformly at random, with replacement.
    fn init_centroids(&self, x: &Matrix<f64>, rng: &mut StdRng) -> Matrix<f64> {
        let (n_samples, n_features) = x.shape();
        let mut data = Vec::with_capacity(self.n_clusters * n_features);

        for _ in 0..self.n_clusters {
            let idx = rng.gen_range(0..n_samples);
            for j in 0..n_features {
                data.push(x.get(idx, j));
            }
        }

        Matrix::from_vec(self.n_clusters, n_features, data)
            .expect("centroid dimensions follow from input shape")
    }

    /// Assigns each sample to the nearest centroid.
    fn assign_labels(x: &Matrix<f64>, centroids: &Matrix<f64>) -> Vec<usize> {
        let n_samples = x.n_rows();
        let n_clusters = centroids.n_rows();
        let mut labels = vec![0; n_samples];

        for (i, label) in labels.iter_mut().enumerate() {
            let point = x.row(i);
            let mut min_dist = f64::INFINITY;
            let mut min_cluster = 0;

            for k in 0..n_clusters {
                let centroid = centroids.row(k);
                let dist = (&point - &centroid).norm_squared();
                // Strict comparison keeps the lowest index on ties
                if dist < min_dist {
                    min_dist = dist;
                    min_cluster = k;
                }
            }

            *label = min_cluster;
        }

        labels
    }

    /// Updates centroids as the mean of assigned samples; empty clusters
    /// keep their previous centroid.
    fn update_centroids(
        &self,
        x: &Matrix<f64>,
        labels: &[usize],
        previous: &Matrix<f64>,
    ) -> Matrix<f64> {
        let (_, n_features) = x.shape();
        let mut sums = vec![0.0; self.n_clusters * n_features];
        let mut counts = vec![0usize; self.n_clusters];

        for (i, &label) in labels.iter().enumerate() {
            counts[label] += 1;
            for j in 0..n_features {
                sums[label * n_features + j] += x.get(i, j);
            }
        }

        for k in 0..self.n_clusters {
            if counts[k] == 0 {
                for j in 0..n_features {
                    sums[k * n_features + j] = previous.get(k, j);
                }
            } else {
                for j in 0..n_features {
                    sums[k * n_features + j] /= counts[k] as f64;
                }
            }
        }

        Matrix::from_vec(self.n_clusters, n_features, sums)
            .expect("centroid dimensions follow from input shape")
    }
}

impl UnsupervisedEstimator for KMeans {
    type Fitted = KMeansModel;

    /// Fits k-means over the rows of `x`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidHyperparameter`] if k is zero and
    /// [`EngineError::EmptyDataset`] if `x` has fewer rows than k.
    fn fit(&self, x: &Matrix<f64>) -> Result<KMeansModel> {
        let n_samples = x.n_rows();

        if self.n_clusters == 0 {
            return Err(EngineError::InvalidHyperparameter {
                param: "n_clusters".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }

        if n_samples < self.n_clusters {
            return Err(EngineError::empty_dataset(&format!(
                "clustering needs at least {} records, got {n_samples}",
                self.n_clusters
            )));
        }

        let mut rng = match self.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut centroids = self.init_centroids(x, &mut rng);
        let mut labels = Self::assign_labels(x, &centroids);
        let mut n_iter = 1;

        for iter in 1..self.max_iter {
            let updated = self.update_centroids(x, &labels, &centroids);
            let new_labels = Self::assign_labels(x, &updated);
            centroids = updated;
            n_iter = iter + 1;

            let converged = new_labels == labels;
            labels = new_labels;
            if converged {
                break;
            }
        }

        let inertia = inertia(x, &centroids, &labels);

        Ok(KMeansModel {
            centroids,
            labels,
            inertia,
            n_iter,
        })
    }
}

/// Immutable fitted k-means model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KMeansModel {
    centroids: Matrix<f64>,
    labels: Vec<usize>,
    inertia: f64,
    n_iter: usize,
}

impl KMeansModel {
    /// Returns the cluster centroids (one row per cluster).
    #[must_use]
    pub fn centroids(&self) -> &Matrix<f64> {
        &self.centroids
    }

    /// Returns the training labels, one per input row.
    #[must_use]
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Returns the within-cluster sum of squares.
    #[must_use]
    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    /// Returns the number of iterations run.
    #[must_use]
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// Number of clusters.
    #[must_use]
    pub fn n_clusters(&self) -> usize {
        self.centroids.n_rows()
    }

    /// Predicts cluster labels for new rows.
    #[must_use]
    pub fn predict(&self, x: &Matrix<f64>) -> Vec<usize> {
        KMeans::assign_labels(x, &self.centroids)
    }

    /// Returns the nearest centroid index for a single point.
    ///
    /// # Panics
    ///
    /// Panics if the point width differs from the centroid width.
    #[must_use]
    pub fn assign_row(&self, point: &[f64]) -> usize {
        assert_eq!(
            point.len(),
            self.centroids.n_cols(),
            "point width must match centroid width"
        );

        let mut min_dist = f64::INFINITY;
        let mut min_cluster = 0;

        for k in 0..self.centroids.n_rows() {
            let mut dist = 0.0;
            for (j, &value) in point.iter().enumerate() {
                let diff = value - self.centroids.get(k, j);
                dist += diff * diff;
            }
            if dist < min_dist {
                min_dist = dist;
                min_cluster = k;
            }
        }

        min_cluster
    }

    #[cfg(test)]
    pub(crate) fn from_parts(centroids: Matrix<f64>, labels: Vec<usize>) -> Self {
        Self {
            centroids,
            labels,
            inertia: 0.0,
            n_iter: 0,
        }
    }
}
