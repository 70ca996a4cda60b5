//! Linear score prediction via ordinary least squares.
//!
//! Fits `exam_score` against the four cognitive features plus scaled
//! engagement using the normal equation `β = (XᵗX)⁻¹ Xᵗ y`, solved through
//! Gauss-Jordan inversion with partial pivoting.

use crate::error::{EngineError, Result};
use crate::metrics::r_squared;
use crate::primitives::{Matrix, Vector};
use crate::record::{CognitiveProfile, LearnerRecord, FEATURE_NAMES};
use crate::traits::Estimator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Engagement minutes are divided by this before entering the design
/// matrix, keeping their magnitude comparable to the [0,100] features.
pub const ENGAGEMENT_DIVISOR: f64 = 100.0;

/// Number of regression features (four cognitive + engagement).
const N_REGRESSORS: usize = FEATURE_NAMES.len();

/// Ordinary least squares predictor for learner exam scores.
///
/// `fit` consumes records and returns an immutable [`ScoreModel`];
/// prediction before training is not expressible. Re-fitting means calling
/// `fit` again for a fresh model.
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
///     .map(|i| LearnerRecord::new(
///         format!("s-{i}"),
///         "demo",
///         CognitiveProfile::new(c[i], r[i], f[i], p[i]),
///         2.0 * c[i] + 3.0 * r[i] + 1.0,
///         e[i],
///     ))
///     .collect();
///
/// let model = ScorePredictor::new().fit(&records).unwrap();
/// assert!((model.intercept() - 1.0).abs() < 1e-6);
/// assert!((model.score(&records) - 1.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ScorePredictor;

impl ScorePredictor {
    /// Creates a new predictor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Builds the design matrix: intercept column of ones, the four
    /// cognitive features, then scaled engagement.
    fn design_matrix(records: &[LearnerRecord]) -> Result<Matrix<f64>> {
        let n = records.len();
        let mut data = Vec::with_capacity(n * (N_REGRESSORS + 1));

        for record in records {
            data.push(1.0);
            data.extend_from_slice(&record.profile.as_array());
            data.push(record.engagement_minutes / ENGAGEMENT_DIVISOR);
        }

        Matrix::from_vec(n, N_REGRESSORS + 1, data)
    }
}

impl Estimator for ScorePredictor {
    type Fitted = ScoreModel;

    /// Fits the model using normal equations.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyDataset`] for no records and
    /// [`EngineError::SingularMatrix`] when `XᵗX` is not invertible
    /// (collinear features, duplicate-only rows).
    fn fit(&self, records: &[LearnerRecord]) -> Result<ScoreModel> {
        if records.is_empty() {
            return Err(EngineError::empty_dataset("regression training"));
        }

        let x = Self::design_matrix(records)?;
        let y = Vector::from_vec(records.iter().map(|r| r.exam_score).collect());

        let xt = x.transpose();
        let xtx = xt.matmul(&x)?;
        let xty = xt.matvec(&y)?;

        let beta = xtx.invert()?.matvec(&xty)?;

        let mut coefficients = [0.0; N_REGRESSORS];
        for (i, coefficient) in coefficients.iter_mut().enumerate() {
            *coefficient = beta[i + 1];
        }

        Ok(ScoreModel {
            intercept: beta[0],
            coefficients,
        })
    }
}

/// Immutable fitted linear model over learner features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreModel {
    intercept: f64,
    /// Coefficients in [`FEATURE_NAMES`] order.
    coefficients: [f64; N_REGRESSORS],
}

/// Output of a single prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted exam score, clipped to [0,100].
    pub score: f64,
    /// Heuristic confidence in [0.6,0.95]; not a statistical interval.
    pub confidence: f64,
    /// Per-feature importance percentages, summing to 100.
    pub feature_importance: BTreeMap<String, f64>,
}

impl ScoreModel {
    /// Returns the intercept term.
    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Returns the coefficients in [`FEATURE_NAMES`] order.
    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Looks up a coefficient by feature name.
    #[must_use]
    pub fn coefficient(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|&f| f == name)
            .map(|i| self.coefficients[i])
    }

    /// Predicts the exam score for a profile and engagement level.
    ///
    /// The raw linear combination is clipped to [0,100]. Confidence is the
    /// fixed heuristic `clamp(1 − |score − 75| / 100, 0.6, 0.95)`.
    #[must_use]
    pub fn predict(&self, profile: &CognitiveProfile, engagement_minutes: f64) -> Prediction {
        let features = Self::regressors(profile, engagement_minutes);
        let raw: f64 = self.intercept
            + features
                .iter()
                .zip(self.coefficients.iter())
                .map(|(value, coefficient)| value * coefficient)
                .sum::<f64>();

        let score = raw.clamp(0.0, 100.0);
        let confidence = (1.0 - (score - 75.0).abs() / 100.0).clamp(0.6, 0.95);

        Prediction {
            score,
            confidence,
            feature_importance: self.feature_importance(),
        }
    }

    /// Global feature importance: coefficient magnitudes normalized to sum
    /// to 100. Identical for every prediction; it measures the model's
    /// sensitivity to a feature, not a record's contribution.
    #[must_use]
    pub fn feature_importance(&self) -> BTreeMap<String, f64> {
        let total: f64 = self.coefficients.iter().map(|c| c.abs()).sum();

        FEATURE_NAMES
            .iter()
            .zip(self.coefficients.iter())
            .map(|(&name, coefficient)| {
                let share = if total < 1e-12 {
                    // All-zero coefficients: spread evenly
                    100.0 / N_REGRESSORS as f64
                } else {
                    coefficient.abs() / total * 100.0
                };
                (name.to_string(), share)
            })
            .collect()
    }

    /// Computes R² of the model's predictions over `records`.
    #[must_use]
    pub fn score(&self, records: &[LearnerRecord]) -> f64 {
        let predicted = Vector::from_vec(
            records
                .iter()
                .map(|r| self.predict(&r.profile, r.engagement_minutes).score)
                .collect(),
        );
        let actual = Vector::from_vec(records.iter().map(|r| r.exam_score).collect());
        r_squared(&predicted, &actual)
    }

    fn regressors(profile: &CognitiveProfile, engagement_minutes: f64) -> [f64; N_REGRESSORS] {
        let cognitive = profile.as_array();
        [
            cognitive[0],
            cognitive[1],
            cognitive[2],
            cognitive[3],
            engagement_minutes / ENGAGEMENT_DIVISOR,
        ]
    }
}
