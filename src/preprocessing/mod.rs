//! Preprocessing transformers for data standardization.
//!
//! # Example
//!
//! ```
//! use pronostico::preprocessing::StandardScaler;
//! use pronostico::primitives::Matrix;
//!
//! let data = Matrix::from_vec(4, 2, vec![
//!     1.0, 100.0,
//!     2.0, 200.0,
//!     3.0, 300.0,
//!     4.0, 400.0,
//! ]).expect("valid matrix dimensions");
//!
//! let scaler = StandardScaler::fit(&data).expect("non-empty data");
//! let scaled = scaler.transform(&data).expect("matching width");
//!
//! // Each column now has mean ~0 and unit variance
//! for j in 0..2 {
//!     let mean: f64 = (0..4).map(|i| scaled.get(i, j)).sum::<f64>() / 4.0;
//!     assert!(mean.abs() < 1e-9);
//! }
//! ```

use crate::error::{EngineError, Result};
use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};

/// Standardizes features to zero mean and unit variance (z-scores).
///
/// The standard score of a value is `z = (x - mean) / std`, using the
/// population standard deviation; a feature with zero spread gets std
/// replaced by 1.0 so the division is well-defined.
///
/// `fit` returns an immutable fitted scaler; the same scaler is reused for
/// the training pass and for later single-point classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    std: Vec<f64>,
}

impl StandardScaler {
    /// Computes per-feature mean and standard deviation over `x`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyDataset`] if `x` has zero rows.
    pub fn fit(x: &Matrix<f64>) -> Result<Self> {
        let (n_samples, n_features) = x.shape();

        if n_samples == 0 {
            return Err(EngineError::empty_dataset("scaler fit requires samples"));
        }

        let mut mean = vec![0.0; n_features];
        for (j, mean_j) in mean.iter_mut().enumerate() {
            let mut sum = 0.0;
            for i in 0..n_samples {
                sum += x.get(i, j);
            }
            *mean_j = sum / n_samples as f64;
        }

        let mut std = vec![0.0; n_features];
        for (j, std_j) in std.iter_mut().enumerate() {
            let mut sum_sq = 0.0;
            for i in 0..n_samples {
                let diff = x.get(i, j) - mean[j];
                sum_sq += diff * diff;
            }
            let variance = sum_sq / n_samples as f64;
            let sd = variance.sqrt();
            // Constant features would divide by zero
            *std_j = if sd > 0.0 { sd } else { 1.0 };
        }

        Ok(Self { mean, std })
    }

    /// Returns the per-feature means.
    #[must_use]
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Returns the per-feature standard deviations (zeros replaced by 1.0).
    #[must_use]
    pub fn std(&self) -> &[f64] {
        &self.std
    }

    /// Number of features this scaler was fitted on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Transforms every row of `x` into z-scores.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DimensionMismatch`] if the column count
    /// differs from the fitted width.
    pub fn transform(&self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
        let (n_samples, n_features) = x.shape();
        self.check_width(n_features)?;

        let mut data = Vec::with_capacity(n_samples * n_features);
        for i in 0..n_samples {
            for j in 0..n_features {
                data.push((x.get(i, j) - self.mean[j]) / self.std[j]);
            }
        }

        Matrix::from_vec(n_samples, n_features, data)
    }

    /// Transforms a single row into z-scores.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DimensionMismatch`] if the row width differs
    /// from the fitted width.
    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>> {
        self.check_width(row.len())?;
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(self.std.iter()))
            .map(|(value, (mean, std))| (value - mean) / std)
            .collect())
    }

    /// Maps a normalized row back to original units.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DimensionMismatch`] if the row width differs
    /// from the fitted width.
    pub fn inverse_transform_row(&self, row: &[f64]) -> Result<Vec<f64>> {
        self.check_width(row.len())?;
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(self.std.iter()))
            .map(|(z, (mean, std))| z * std + mean)
            .collect())
    }

    fn check_width(&self, n_features: usize) -> Result<()> {
        if n_features != self.mean.len() {
            return Err(EngineError::dimension_mismatch(
                format!("{} features", self.mean.len()),
                format!("{n_features} features"),
            ));
        }
        Ok(())
    }
}
