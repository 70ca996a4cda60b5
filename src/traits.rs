//! Core traits for estimators.
//!
//! Fitting returns an immutable model value instead of mutating the
//! estimator in place: a fitted model cannot exist partially trained, and
//! inference on shared references is safe to run concurrently.

use crate::error::Result;
use crate::primitives::Matrix;
use crate::record::LearnerRecord;

/// Trait for estimators that fit over learner records.
///
/// # Examples
///
/// ```
/// use pronostico::prelude::*;
///
/// let c = [5.0, 12.0, 8.0, 15.0, 3.0, 10.0, 7.0, 14.0];
/// let r = [7.0, 3.0, 12.0, 9.0, 15.0, 5.0, 11.0, 6.0];
/// let f = [30.0, 10.0, 50.0, 20.0, 40.0, 60.0, 25.0, 35.0];
/// let p = [40.0, 70.0, 20.0, 55.0, 35.0, 15.0, 65.0, 45.0];
/// let e = [100.0, 150.0, 90.0, 200.0, 120.0, 60.0, 180.0, 140.0];
/// let records: Vec<LearnerRecord> = (0..8)
///     .map(|i| {
///         LearnerRecord::new(
///             format!("s-{i}"),
///             "demo",
///             CognitiveProfile::new(c[i], r[i], f[i], p[i]),
///             2.0 * c[i] + 3.0 * r[i] + 1.0,
///             e[i],
///         )
///     })
///     .collect();
///
/// let model = ScorePredictor::new().fit(&records).unwrap();
/// let prediction = model.predict(&records[0].profile, records[0].engagement_minutes);
/// assert!(prediction.score >= 0.0 && prediction.score <= 100.0);
/// ```
pub trait Estimator {
    /// The immutable fitted model produced by `fit`.
    type Fitted;

    /// Fits a model over the records.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails (empty dataset, singular design,
    /// invalid hyperparameters).
    fn fit(&self, records: &[LearnerRecord]) -> Result<Self::Fitted>;
}

/// Trait for unsupervised estimators that fit over a numeric matrix.
pub trait UnsupervisedEstimator {
    /// The immutable fitted model produced by `fit`.
    type Fitted;

    /// Fits a model over the rows of `x`.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails (too few samples, invalid
    /// parameters).
    fn fit(&self, x: &Matrix<f64>) -> Result<Self::Fitted>;
}
